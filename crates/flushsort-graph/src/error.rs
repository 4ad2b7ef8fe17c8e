use thiserror::Error as ThisError;

///
/// CycleError
///
/// Returned when a linear extension was requested for a graph that still
/// contains a cycle. `unresolved` counts the vertices that never became
/// ready.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
#[error("graph is not acyclic: {unresolved} vertices could not be ordered")]
pub struct CycleError {
    pub unresolved: usize,
}
