//! Observability: sorter telemetry and the sink boundary it flows through.
//!
//! Sorter logic records `SorterEvent`s through an `EventSink`; only the
//! global sink touches process-wide metrics state.

pub(crate) mod metrics;
pub mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, EventState, TableCounters, TableSummary};
pub use sink::{EventSink, GlobalEventSink, SorterEvent, metrics_report, metrics_reset_all};
