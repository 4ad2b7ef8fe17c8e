use indexmap::{IndexMap, IndexSet};
use std::{fmt, hash::Hash, iter};

///
/// ArcRef
///
/// Borrowed view of one labeled arc, as produced by graph iteration.
///

pub struct ArcRef<'a, V, L> {
    pub origin: &'a V,
    pub destination: &'a V,
    pub label: &'a L,
}

impl<V, L> ArcRef<'_, V, L> {
    /// Swap origin and destination, keeping the label.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            origin: self.destination,
            destination: self.origin,
            label: self.label,
        }
    }
}

impl<V, L> Clone for ArcRef<'_, V, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V, L> Copy for ArcRef<'_, V, L> {}

impl<V: fmt::Debug, L: fmt::Debug> fmt::Debug for ArcRef<'_, V, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcRef")
            .field("origin", self.origin)
            .field("destination", self.destination)
            .field("label", self.label)
            .finish()
    }
}

pub type VertexIter<'a, V> = Box<dyn Iterator<Item = &'a V> + 'a>;
pub type ArcIter<'a, V, L> = Box<dyn Iterator<Item = ArcRef<'a, V, L>> + 'a>;

///
/// DigraphView
///
/// Read capability shared by the concrete graph store and every view
/// layered over it. Iteration order carries no meaning for correctness.
///

pub trait DigraphView {
    type Vertex: Eq + Hash;
    type Label;

    /// Number of visible vertices.
    fn order(&self) -> usize;

    fn contains_vertex(&self, vertex: &Self::Vertex) -> bool;

    fn get_arc(&self, origin: &Self::Vertex, destination: &Self::Vertex) -> Option<&Self::Label>;

    fn vertex_iter(&self) -> VertexIter<'_, Self::Vertex>;

    /// Arcs leaving `vertex`. Unknown vertices yield nothing.
    fn outgoing_iter<'a>(&'a self, vertex: &Self::Vertex) -> ArcIter<'a, Self::Vertex, Self::Label>;

    /// Arcs entering `vertex`, reported with their original direction.
    fn incoming_iter<'a>(&'a self, vertex: &Self::Vertex) -> ArcIter<'a, Self::Vertex, Self::Label>;

    fn has_arc(&self, origin: &Self::Vertex, destination: &Self::Vertex) -> bool {
        self.get_arc(origin, destination).is_some()
    }
}

impl<G: DigraphView + ?Sized> DigraphView for &G {
    type Vertex = G::Vertex;
    type Label = G::Label;

    fn order(&self) -> usize {
        (**self).order()
    }

    fn contains_vertex(&self, vertex: &Self::Vertex) -> bool {
        (**self).contains_vertex(vertex)
    }

    fn get_arc(&self, origin: &Self::Vertex, destination: &Self::Vertex) -> Option<&Self::Label> {
        (**self).get_arc(origin, destination)
    }

    fn vertex_iter(&self) -> VertexIter<'_, Self::Vertex> {
        (**self).vertex_iter()
    }

    fn outgoing_iter<'a>(&'a self, vertex: &Self::Vertex) -> ArcIter<'a, Self::Vertex, Self::Label> {
        (**self).outgoing_iter(vertex)
    }

    fn incoming_iter<'a>(&'a self, vertex: &Self::Vertex) -> ArcIter<'a, Self::Vertex, Self::Label> {
        (**self).incoming_iter(vertex)
    }
}

///
/// Digraph
///
/// Insertion-ordered adjacency store. Each ordered vertex pair carries at
/// most one arc; writing an existing pair replaces (or, via
/// `arc_or_insert_with`, merges into) its label. Vertices and arcs are
/// never removed.
///

pub struct Digraph<V, L> {
    adjacency: IndexMap<V, Adjacency<V, L>>,
    size: usize,
}

struct Adjacency<V, L> {
    outgoing: IndexMap<V, L>,
    incoming: IndexSet<V>,
}

impl<V, L> Default for Adjacency<V, L> {
    fn default() -> Self {
        Self {
            outgoing: IndexMap::new(),
            incoming: IndexSet::new(),
        }
    }
}

impl<V, L> Digraph<V, L>
where
    V: Clone + Eq + Hash,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            adjacency: IndexMap::new(),
            size: 0,
        }
    }

    #[must_use]
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            adjacency: IndexMap::with_capacity(vertices),
            size: 0,
        }
    }

    /// Add a vertex. Returns `false` when it was already present.
    pub fn add_vertex(&mut self, vertex: V) -> bool {
        if self.adjacency.contains_key(&vertex) {
            return false;
        }
        self.adjacency.insert(vertex, Adjacency::default());

        true
    }

    /// Set the label of `origin -> destination`, adding either endpoint if
    /// missing. Returns the label it replaced.
    pub fn put_arc(&mut self, origin: V, destination: V, label: L) -> Option<L> {
        self.link(&origin, &destination);
        self.adjacency
            .entry(origin)
            .or_default()
            .outgoing
            .insert(destination, label)
    }

    /// Label of `origin -> destination`, inserting `init()` first when the
    /// arc does not exist yet.
    pub fn arc_or_insert_with(
        &mut self,
        origin: V,
        destination: V,
        init: impl FnOnce() -> L,
    ) -> &mut L {
        self.link(&origin, &destination);
        self.adjacency
            .entry(origin)
            .or_default()
            .outgoing
            .entry(destination)
            .or_insert_with(init)
    }

    pub fn arc_mut(&mut self, origin: &V, destination: &V) -> Option<&mut L> {
        self.adjacency
            .get_mut(origin)
            .and_then(|adjacency| adjacency.outgoing.get_mut(destination))
    }

    /// Number of arcs.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    // Record the reverse half of a new arc and bump the arc count.
    // The forward half is written by the caller.
    fn link(&mut self, origin: &V, destination: &V) {
        let exists = self
            .adjacency
            .get(origin)
            .is_some_and(|adjacency| adjacency.outgoing.contains_key(destination));
        if exists {
            return;
        }

        self.adjacency
            .entry(destination.clone())
            .or_default()
            .incoming
            .insert(origin.clone());
        self.size += 1;
    }
}

impl<V, L> Default for Digraph<V, L>
where
    V: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, L> fmt::Debug for Digraph<V, L>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Digraph")
            .field("order", &self.adjacency.len())
            .field("size", &self.size)
            .field("vertices", &self.adjacency.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<V, L> DigraphView for Digraph<V, L>
where
    V: Eq + Hash,
{
    type Vertex = V;
    type Label = L;

    fn order(&self) -> usize {
        self.adjacency.len()
    }

    fn contains_vertex(&self, vertex: &V) -> bool {
        self.adjacency.contains_key(vertex)
    }

    fn get_arc(&self, origin: &V, destination: &V) -> Option<&L> {
        self.adjacency
            .get(origin)
            .and_then(|adjacency| adjacency.outgoing.get(destination))
    }

    fn vertex_iter(&self) -> VertexIter<'_, V> {
        Box::new(self.adjacency.keys())
    }

    fn outgoing_iter<'a>(&'a self, vertex: &V) -> ArcIter<'a, V, L> {
        let Some((origin, adjacency)) = self.adjacency.get_key_value(vertex) else {
            return Box::new(iter::empty());
        };

        Box::new(
            adjacency
                .outgoing
                .iter()
                .map(move |(destination, label)| ArcRef {
                    origin,
                    destination,
                    label,
                }),
        )
    }

    fn incoming_iter<'a>(&'a self, vertex: &V) -> ArcIter<'a, V, L> {
        let Some((destination, adjacency)) = self.adjacency.get_key_value(vertex) else {
            return Box::new(iter::empty());
        };

        Box::new(adjacency.incoming.iter().filter_map(move |origin| {
            let (origin, source) = self.adjacency.get_key_value(origin)?;
            let label = source.outgoing.get(destination)?;

            Some(ArcRef {
                origin,
                destination,
                label,
            })
        }))
    }
}

///
/// TESTS
///
