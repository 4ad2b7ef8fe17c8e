//! Non-materializing decorators over a [`DigraphView`].
//!
//! Views hold their inner graph by value; since `&G` is itself a view,
//! `Filtered::new(Reversed::new(&graph), ..)` composes without copying.

use crate::digraph::{ArcIter, ArcRef, DigraphView, VertexIter};
use std::iter;

///
/// Reversed
///
/// Swaps origin and destination on every query.
///

#[derive(Clone, Copy, Debug)]
pub struct Reversed<G> {
    inner: G,
}

impl<G: DigraphView> Reversed<G> {
    #[must_use]
    pub const fn new(inner: G) -> Self {
        Self { inner }
    }

    #[must_use]
    pub fn into_inner(self) -> G {
        self.inner
    }
}

impl<G: DigraphView> DigraphView for Reversed<G> {
    type Vertex = G::Vertex;
    type Label = G::Label;

    fn order(&self) -> usize {
        self.inner.order()
    }

    fn contains_vertex(&self, vertex: &Self::Vertex) -> bool {
        self.inner.contains_vertex(vertex)
    }

    fn get_arc(&self, origin: &Self::Vertex, destination: &Self::Vertex) -> Option<&Self::Label> {
        self.inner.get_arc(destination, origin)
    }

    fn vertex_iter(&self) -> VertexIter<'_, Self::Vertex> {
        self.inner.vertex_iter()
    }

    fn outgoing_iter<'a>(&'a self, vertex: &Self::Vertex) -> ArcIter<'a, Self::Vertex, Self::Label> {
        Box::new(self.inner.incoming_iter(vertex).map(ArcRef::reversed))
    }

    fn incoming_iter<'a>(&'a self, vertex: &Self::Vertex) -> ArcIter<'a, Self::Vertex, Self::Label> {
        Box::new(self.inner.outgoing_iter(vertex).map(ArcRef::reversed))
    }
}

///
/// Filtered
///
/// Hides vertices rejected by `vertex_filter` (and every arc touching
/// them) and arcs rejected by `arc_filter`. Predicates are evaluated on
/// each query, so a filter may consult state that changes between passes.
///

pub struct Filtered<G, VF, AF> {
    inner: G,
    vertex_filter: VF,
    arc_filter: AF,
}

/// Arc predicate accepting everything.
pub type AcceptArcs<V, L> = fn(&ArcRef<'_, V, L>) -> bool;

const fn accept_arc<V, L>(_: &ArcRef<'_, V, L>) -> bool {
    true
}

impl<G, VF> Filtered<G, VF, AcceptArcs<G::Vertex, G::Label>>
where
    G: DigraphView,
    VF: Fn(&G::Vertex) -> bool,
{
    /// Restrict by vertex only.
    pub fn by_vertex(inner: G, vertex_filter: VF) -> Self {
        Self {
            inner,
            vertex_filter,
            arc_filter: accept_arc::<G::Vertex, G::Label>,
        }
    }
}

impl<G, VF, AF> Filtered<G, VF, AF>
where
    G: DigraphView,
    VF: Fn(&G::Vertex) -> bool,
    AF: Fn(&ArcRef<'_, G::Vertex, G::Label>) -> bool,
{
    pub const fn new(inner: G, vertex_filter: VF, arc_filter: AF) -> Self {
        Self {
            inner,
            vertex_filter,
            arc_filter,
        }
    }

    fn visible(&self, vertex: &G::Vertex) -> bool {
        (self.vertex_filter)(vertex)
    }

    fn admits(&self, arc: &ArcRef<'_, G::Vertex, G::Label>) -> bool {
        self.visible(arc.origin) && self.visible(arc.destination) && (self.arc_filter)(arc)
    }
}

impl<G, VF, AF> DigraphView for Filtered<G, VF, AF>
where
    G: DigraphView,
    VF: Fn(&G::Vertex) -> bool,
    AF: Fn(&ArcRef<'_, G::Vertex, G::Label>) -> bool,
{
    type Vertex = G::Vertex;
    type Label = G::Label;

    fn order(&self) -> usize {
        self.inner.vertex_iter().filter(|&vertex| self.visible(vertex)).count()
    }

    fn contains_vertex(&self, vertex: &Self::Vertex) -> bool {
        self.inner.contains_vertex(vertex) && self.visible(vertex)
    }

    fn get_arc(&self, origin: &Self::Vertex, destination: &Self::Vertex) -> Option<&Self::Label> {
        let label = self.inner.get_arc(origin, destination)?;
        let arc = ArcRef {
            origin,
            destination,
            label,
        };

        self.admits(&arc).then_some(label)
    }

    fn vertex_iter(&self) -> VertexIter<'_, Self::Vertex> {
        Box::new(self.inner.vertex_iter().filter(|&vertex| self.visible(vertex)))
    }

    fn outgoing_iter<'a>(&'a self, vertex: &Self::Vertex) -> ArcIter<'a, Self::Vertex, Self::Label> {
        if !self.visible(vertex) {
            return Box::new(iter::empty());
        }

        Box::new(
            self.inner
                .outgoing_iter(vertex)
                .filter(|arc| self.admits(arc)),
        )
    }

    fn incoming_iter<'a>(&'a self, vertex: &Self::Vertex) -> ArcIter<'a, Self::Vertex, Self::Label> {
        if !self.visible(vertex) {
            return Box::new(iter::empty());
        }

        Box::new(
            self.inner
                .incoming_iter(vertex)
                .filter(|arc| self.admits(arc)),
        )
    }
}

///
/// TESTS
///
