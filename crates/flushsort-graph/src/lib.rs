//! Directed-graph primitives for dependency ordering: a build-once labeled
//! digraph, non-materializing views over it, explicit-stack traversals,
//! strongly-connected-component contraction, and an indegree-driven
//! topological sequencer.
//!
//! Nothing in this crate knows about tables or objects; callers choose the
//! vertex and label types.
#![warn(unreachable_pub)]

pub mod digraph;
pub mod error;
pub mod scc;
pub mod topo;
pub mod traversal;
pub mod view;

pub use digraph::{ArcIter, ArcRef, Digraph, DigraphView, VertexIter};
pub use error::CycleError;
pub use scc::{ComponentId, Condensation, StrongConnection};
pub use topo::IndegreeTopologicalSort;
pub use traversal::{DepthFirstSearch, Stamp, StampedDepthFirstSearch};
pub use view::{Filtered, Reversed};
