//! ## Crate layout
//! - `core`: schema metadata, live-object seams, the entity sorter, and
//!   its error/config/obs plumbing.
//! - `graph`: generic digraph store, views, traversals, SCC contraction,
//!   and the topological sequencer the sorter is built on.
//!
//! The `prelude` module mirrors the surface a persistence layer needs at
//! flush time.

pub use flushsort_core as core;
pub use flushsort_graph as graph;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::{config::SorterConfig, error::SortError as Error};

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::prelude::*;
    pub use crate::core::{config::SorterConfig, error::SortError, object::NoSnapshots};
}
