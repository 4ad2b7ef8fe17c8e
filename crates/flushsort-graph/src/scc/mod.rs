//! Strongly-connected components and graph condensation.
//!
//! Components are extracted in two alternating passes. A stamped
//! depth-first pass over every unclaimed vertex records completion order;
//! then, latest-completed first, each unclaimed vertex roots a search over
//! the reversed graph restricted to completed, unclaimed vertices, and
//! everything that search reaches forms one component.

#[cfg(test)]
mod tests;

use crate::{
    digraph::{Digraph, DigraphView},
    traversal::{DepthFirstSearch, StampedDepthFirstSearch},
    view::{Filtered, Reversed},
};
use derive_more::Display;
use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

///
/// ComponentId
///
/// Position of a component in discovery order. Only meaningful together
/// with the `StrongConnection` or `Condensation` that produced it.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("component#{_0}")]
pub struct ComponentId(usize);

impl ComponentId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

///
/// StrongConnection
///
/// Lazy iterator over the strongly-connected components of a graph. Each
/// item lists the member vertices; order within a component is
/// unspecified.
///

pub struct StrongConnection<'g, G>
where
    G: DigraphView + ?Sized,
{
    graph: &'g G,
    seeds: Vec<G::Vertex>,
    claimed: HashSet<G::Vertex>,
    completed: HashSet<G::Vertex>,
    finish_order: Vec<G::Vertex>,
    components: Vec<Vec<G::Vertex>>,
    membership: HashMap<G::Vertex, ComponentId>,
}

impl<'g, G> StrongConnection<'g, G>
where
    G: DigraphView + ?Sized,
    G::Vertex: Clone,
{
    #[must_use]
    pub fn new(graph: &'g G) -> Self {
        let seeds: Vec<G::Vertex> = graph.vertex_iter().cloned().collect();
        let order = seeds.len();

        Self {
            graph,
            seeds,
            claimed: HashSet::with_capacity(order),
            completed: HashSet::with_capacity(order),
            finish_order: Vec::with_capacity(order),
            components: Vec::new(),
            membership: HashMap::with_capacity(order),
        }
    }

    /// Component of `vertex`, if it has been extracted already.
    #[must_use]
    pub fn component_of(&self, vertex: &G::Vertex) -> Option<ComponentId> {
        self.membership.get(vertex).copied()
    }

    /// Drain the remaining components and build the condensation: one
    /// vertex per component, one arc per ordered pair of distinct
    /// components joined by at least one original arc, labeled with every
    /// original label it absorbed. Arcs inside a component are dropped.
    #[must_use]
    pub fn contract(mut self) -> Condensation<G::Vertex, G::Label>
    where
        G::Label: Clone,
    {
        while self.next().is_some() {}

        let mut graph = Digraph::with_capacity(self.components.len());
        for index in 0..self.components.len() {
            graph.add_vertex(ComponentId(index));
        }

        for vertex in self.graph.vertex_iter() {
            let Some(&from) = self.membership.get(vertex) else {
                continue;
            };
            for arc in self.graph.outgoing_iter(vertex) {
                let Some(&to) = self.membership.get(arc.destination) else {
                    continue;
                };
                if from != to {
                    graph
                        .arc_or_insert_with(from, to, Vec::new)
                        .push(arc.label.clone());
                }
            }
        }

        Condensation {
            graph,
            components: self.components,
            membership: self.membership,
        }
    }

    // Run one stamped pass over every unclaimed vertex. Returns false when
    // nothing is left to claim.
    fn stamp_pass(&mut self) -> bool {
        let order = {
            let claimed = &self.claimed;
            let view = Filtered::by_vertex(self.graph, |v: &G::Vertex| !claimed.contains(v));
            let mut search = StampedDepthFirstSearch::new(&view);
            let mut order = Vec::new();

            for seed in &self.seeds {
                if claimed.contains(seed) || search.is_seen(seed) {
                    continue;
                }
                if search.reset(seed) {
                    order.extend(search.by_ref().map(|(vertex, _)| vertex.clone()));
                }
            }

            order
        };

        if order.is_empty() {
            return false;
        }

        self.completed.clear();
        self.completed.extend(order.iter().cloned());
        self.finish_order = order;

        true
    }

    // Collect everything that reaches `root` among completed, unclaimed
    // vertices.
    fn collect_component(&self, root: &G::Vertex) -> Vec<G::Vertex> {
        let claimed = &self.claimed;
        let completed = &self.completed;
        let view = Filtered::by_vertex(Reversed::new(self.graph), |v: &G::Vertex| {
            completed.contains(v) && !claimed.contains(v)
        });

        DepthFirstSearch::new(&view, root).cloned().collect()
    }

    fn claim(&mut self, members: Vec<G::Vertex>) -> Vec<G::Vertex> {
        let id = ComponentId(self.components.len());
        for member in &members {
            self.claimed.insert(member.clone());
            self.membership.insert(member.clone(), id);
        }
        self.components.push(members.clone());

        members
    }
}

impl<G> Iterator for StrongConnection<'_, G>
where
    G: DigraphView + ?Sized,
    G::Vertex: Clone,
{
    type Item = Vec<G::Vertex>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while let Some(root) = self.finish_order.pop() {
                if self.claimed.contains(&root) {
                    continue;
                }
                let members = self.collect_component(&root);

                return Some(self.claim(members));
            }

            if !self.stamp_pass() {
                return None;
            }
        }
    }
}

///
/// Condensation
///
/// DAG of components produced by [`StrongConnection::contract`].
///

pub struct Condensation<V, L> {
    graph: Digraph<ComponentId, Vec<L>>,
    components: Vec<Vec<V>>,
    membership: HashMap<V, ComponentId>,
}

impl<V, L> Condensation<V, L>
where
    V: Eq + Hash,
{
    #[must_use]
    pub const fn graph(&self) -> &Digraph<ComponentId, Vec<L>> {
        &self.graph
    }

    #[must_use]
    pub const fn component_count(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn component_of(&self, vertex: &V) -> Option<ComponentId> {
        self.membership.get(vertex).copied()
    }

    #[must_use]
    pub fn members(&self, id: ComponentId) -> &[V] {
        self.components.get(id.0).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &[V])> {
        self.components
            .iter()
            .enumerate()
            .map(|(index, members)| (ComponentId(index), members.as_slice()))
    }
}
