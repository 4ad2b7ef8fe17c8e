use crate::{digraph::DigraphView, error::CycleError};
use std::{
    collections::{HashMap, VecDeque},
    iter::FusedIterator,
};

///
/// IndegreeTopologicalSort
///
/// Lazy linear extension of a DAG (Kahn's algorithm). Ready vertices are
/// released first-in first-out, seeded in the graph's vertex order, so a
/// deterministic graph yields a deterministic sequence.
///
/// When the ready set drains while vertices remain unemitted the input
/// has a cycle: the iterator yields one `Err(CycleError)` and then ends.
/// Collecting into `Result<Vec<_>, _>` therefore never returns a partial
/// order.
///

pub struct IndegreeTopologicalSort<'g, G>
where
    G: DigraphView + ?Sized,
{
    graph: &'g G,
    indegree: HashMap<&'g G::Vertex, usize>,
    ready: VecDeque<&'g G::Vertex>,
    emitted: usize,
    total: usize,
    finished: bool,
}

impl<'g, G> IndegreeTopologicalSort<'g, G>
where
    G: DigraphView + ?Sized,
{
    #[must_use]
    pub fn new(graph: &'g G) -> Self {
        let mut indegree: HashMap<&'g G::Vertex, usize> =
            graph.vertex_iter().map(|vertex| (vertex, 0)).collect();
        for vertex in graph.vertex_iter() {
            for arc in graph.outgoing_iter(vertex) {
                if let Some(count) = indegree.get_mut(arc.destination) {
                    *count += 1;
                }
            }
        }

        let ready = graph
            .vertex_iter()
            .filter(|vertex| indegree.get(vertex).copied() == Some(0))
            .collect();
        let total = indegree.len();

        Self {
            graph,
            indegree,
            ready,
            emitted: 0,
            total,
            finished: false,
        }
    }

    /// Number of vertices emitted so far.
    #[must_use]
    pub const fn emitted(&self) -> usize {
        self.emitted
    }

    /// True once every vertex has been emitted.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.emitted == self.total
    }
}

impl<'g, G> Iterator for IndegreeTopologicalSort<'g, G>
where
    G: DigraphView + ?Sized,
{
    type Item = Result<&'g G::Vertex, CycleError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if let Some(vertex) = self.ready.pop_front() {
            for arc in self.graph.outgoing_iter(vertex) {
                let Some(count) = self.indegree.get_mut(arc.destination) else {
                    continue;
                };
                *count = count.saturating_sub(1);
                if *count == 0 {
                    self.ready.push_back(arc.destination);
                }
            }
            self.emitted += 1;

            return Some(Ok(vertex));
        }

        self.finished = true;
        if self.emitted < self.total {
            return Some(Err(CycleError {
                unresolved: self.total - self.emitted,
            }));
        }

        None
    }
}

impl<G> FusedIterator for IndegreeTopologicalSort<'_, G> where G: DigraphView + ?Sized {}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{digraph::Digraph, view::Filtered};

    #[test]
    fn orders_chain_and_branches() {
        let mut graph: Digraph<&str, ()> = Digraph::new();
        graph.put_arc("customer", "order", ());
        graph.put_arc("order", "order_line", ());
        graph.put_arc("product", "order_line", ());

        let order: Vec<&str> = IndegreeTopologicalSort::new(&graph)
            .map(|step| step.copied())
            .collect::<Result<_, _>>()
            .expect("acyclic");

        let position = |name: &str| order.iter().position(|v| *v == name).expect("emitted");
        assert_eq!(order.len(), 4);
        assert!(position("customer") < position("order"));
        assert!(position("order") < position("order_line"));
        assert!(position("product") < position("order_line"));
    }

    #[test]
    fn seeds_follow_vertex_insertion_order() {
        let mut graph: Digraph<u8, ()> = Digraph::new();
        for vertex in [3, 1, 2] {
            graph.add_vertex(vertex);
        }

        let order: Vec<u8> = IndegreeTopologicalSort::new(&graph)
            .map(|step| step.copied())
            .collect::<Result<_, _>>()
            .expect("acyclic");
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn cycle_yields_sentinel_once_then_ends() {
        let mut graph: Digraph<u8, ()> = Digraph::new();
        graph.put_arc(0, 1, ());
        graph.put_arc(1, 2, ());
        graph.put_arc(2, 1, ());

        let mut sort = IndegreeTopologicalSort::new(&graph);
        assert_eq!(sort.next(), Some(Ok(&0)));
        assert_eq!(sort.next(), Some(Err(CycleError { unresolved: 2 })));
        assert_eq!(sort.next(), None);
        assert!(!sort.is_complete());
    }

    #[test]
    fn self_arc_is_a_cycle() {
        let mut graph: Digraph<u8, ()> = Digraph::new();
        graph.put_arc(7, 7, ());

        let result: Result<Vec<_>, _> = IndegreeTopologicalSort::new(&graph).collect();
        assert_eq!(result, Err(CycleError { unresolved: 1 }));
    }

    #[test]
    fn empty_graph_is_trivially_complete() {
        let graph: Digraph<u8, ()> = Digraph::new();
        let mut sort = IndegreeTopologicalSort::new(&graph);

        assert_eq!(sort.next(), None);
        assert!(sort.is_complete());
    }

    #[test]
    fn filtered_view_ignores_hidden_arcs() {
        let mut graph: Digraph<u8, ()> = Digraph::new();
        graph.put_arc(1, 2, ());
        graph.put_arc(2, 1, ());
        let view = Filtered::by_vertex(&graph, |v: &u8| *v != 2);

        let result: Result<Vec<_>, _> = IndegreeTopologicalSort::new(&view).collect();
        assert_eq!(result, Ok(vec![&1]));
    }
}
