//! Explicit-stack depth-first traversals.
//!
//! Both searches keep one "remaining outgoing arcs" iterator per open
//! vertex instead of recursing, so depth is bounded by memory only.

mod dfs;
mod stamped;

pub use dfs::DepthFirstSearch;
pub use stamped::{Stamp, StampedDepthFirstSearch};
