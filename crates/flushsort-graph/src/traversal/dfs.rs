use crate::digraph::{ArcIter, DigraphView};
use std::{collections::HashSet, iter::FusedIterator};

///
/// DepthFirstSearch
///
/// Lazily yields every vertex reachable from `start` over outgoing arcs,
/// each exactly once, in preorder. The start vertex is yielded first when
/// it is visible in the graph; otherwise the search is empty.
///

pub struct DepthFirstSearch<'g, G>
where
    G: DigraphView + ?Sized,
{
    graph: &'g G,
    stack: Vec<ArcIter<'g, G::Vertex, G::Label>>,
    seen: HashSet<&'g G::Vertex>,
    pending: Option<&'g G::Vertex>,
}

impl<'g, G> DepthFirstSearch<'g, G>
where
    G: DigraphView + ?Sized,
{
    pub fn new(graph: &'g G, start: &'g G::Vertex) -> Self {
        let pending = graph.contains_vertex(start).then_some(start);

        Self {
            graph,
            stack: Vec::new(),
            seen: HashSet::new(),
            pending,
        }
    }

    // Mark a vertex visited and open its outgoing arcs.
    fn enter(&mut self, vertex: &'g G::Vertex) -> bool {
        if !self.seen.insert(vertex) {
            return false;
        }
        self.stack.push(self.graph.outgoing_iter(vertex));

        true
    }
}

impl<'g, G> Iterator for DepthFirstSearch<'g, G>
where
    G: DigraphView + ?Sized,
{
    type Item = &'g G::Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(start) = self.pending.take() {
            self.enter(start);
            return Some(start);
        }

        while let Some(arcs) = self.stack.last_mut() {
            match arcs.next() {
                Some(arc) => {
                    if self.enter(arc.destination) {
                        return Some(arc.destination);
                    }
                }
                None => {
                    self.stack.pop();
                }
            }
        }

        None
    }
}

impl<G> FusedIterator for DepthFirstSearch<'_, G> where G: DigraphView + ?Sized {}

///
/// TESTS
///
