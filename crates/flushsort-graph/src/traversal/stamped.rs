use crate::digraph::{ArcIter, DigraphView};
use std::collections::HashSet;

///
/// Stamp
///
/// Classification assigned when a vertex's subtree is complete. Callers
/// that only need a completion order may treat both alike.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stamp {
    /// Every outgoing arc led to an already-seen (or hidden) vertex.
    Leaf,
    /// At least one child was discovered and fully explored.
    Shrink,
}

struct Frame<'g, V, L> {
    vertex: &'g V,
    arcs: ArcIter<'g, V, L>,
    expanded: bool,
}

///
/// StampedDepthFirstSearch
///
/// Depth-first search that yields each vertex when its exploration
/// finishes (postorder) together with its [`Stamp`].
///
/// `reset` restarts the search from another vertex in place: the stack is
/// cleared but the seen-set is kept, so repeated resets over a vertex list
/// build a single completion order for a whole forest.
///

pub struct StampedDepthFirstSearch<'g, G>
where
    G: DigraphView + ?Sized,
{
    graph: &'g G,
    stack: Vec<Frame<'g, G::Vertex, G::Label>>,
    seen: HashSet<&'g G::Vertex>,
}

impl<'g, G> StampedDepthFirstSearch<'g, G>
where
    G: DigraphView + ?Sized,
{
    /// Idle search; call `reset` to begin.
    #[must_use]
    pub fn new(graph: &'g G) -> Self {
        Self {
            graph,
            stack: Vec::new(),
            seen: HashSet::new(),
        }
    }

    #[must_use]
    pub fn with_start(graph: &'g G, start: &'g G::Vertex) -> Self {
        let mut search = Self::new(graph);
        search.reset(start);

        search
    }

    /// Restart from `start`. Returns `false` (leaving the search idle) when
    /// `start` is hidden or was already seen.
    pub fn reset(&mut self, start: &'g G::Vertex) -> bool {
        self.stack.clear();

        self.graph.contains_vertex(start) && self.open(start)
    }

    #[must_use]
    pub fn is_seen(&self, vertex: &G::Vertex) -> bool {
        self.seen.contains(vertex)
    }

    // Mark a vertex seen and push its frame.
    fn open(&mut self, vertex: &'g G::Vertex) -> bool {
        if !self.seen.insert(vertex) {
            return false;
        }
        self.stack.push(Frame {
            vertex,
            arcs: self.graph.outgoing_iter(vertex),
            expanded: false,
        });

        true
    }
}

impl<'g, G> Iterator for StampedDepthFirstSearch<'g, G>
where
    G: DigraphView + ?Sized,
{
    type Item = (&'g G::Vertex, Stamp);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;

            if let Some(arc) = frame.arcs.next() {
                if !self.seen.contains(arc.destination) {
                    frame.expanded = true;
                    self.open(arc.destination);
                }
                continue;
            }

            let frame = self.stack.pop()?;
            let stamp = if frame.expanded {
                Stamp::Shrink
            } else {
                Stamp::Leaf
            };

            return Some((frame.vertex, stamp));
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digraph::Digraph;

    #[test]
    fn yields_postorder_with_stamps() {
        let mut graph: Digraph<&str, ()> = Digraph::new();
        graph.put_arc("root", "mid", ());
        graph.put_arc("mid", "leaf", ());

        let finished: Vec<_> =
            StampedDepthFirstSearch::with_start(&graph, &"root").collect();

        assert_eq!(
            finished,
            vec![
                (&"leaf", Stamp::Leaf),
                (&"mid", Stamp::Shrink),
                (&"root", Stamp::Shrink),
            ]
        );
    }

    #[test]
    fn back_arc_only_vertex_is_leaf() {
        let mut graph: Digraph<u8, ()> = Digraph::new();
        graph.put_arc(1, 2, ());
        graph.put_arc(2, 1, ());

        let finished: Vec<_> = StampedDepthFirstSearch::with_start(&graph, &1).collect();

        assert_eq!(finished, vec![(&2, Stamp::Leaf), (&1, Stamp::Shrink)]);
    }

    #[test]
    fn reset_keeps_seen_vertices_across_roots() {
        let mut graph: Digraph<u8, ()> = Digraph::new();
        graph.put_arc(1, 2, ());
        graph.put_arc(3, 2, ());

        let mut search = StampedDepthFirstSearch::new(&graph);
        assert!(search.reset(&1));
        let first: Vec<u8> = search.by_ref().map(|(v, _)| *v).collect();
        assert_eq!(first, vec![2, 1]);

        assert!(search.reset(&3));
        let second: Vec<_> = search.by_ref().collect();
        assert_eq!(second, vec![(&3, Stamp::Leaf)]);

        assert!(!search.reset(&2));
        assert_eq!(search.next(), None);
    }

    #[test]
    fn reset_rejects_unknown_vertex() {
        let graph: Digraph<u8, ()> = Digraph::new();
        let mut search = StampedDepthFirstSearch::new(&graph);

        assert!(!search.reset(&9));
        assert_eq!(search.next(), None);
    }
}
