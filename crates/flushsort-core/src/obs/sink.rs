//! Event sink boundary.
//!
//! Sorter logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through SorterEvent and EventSink.
//!
//! `GlobalEventSink` is the only bridge between sorter logic and the
//! process-wide metrics state.
use crate::obs::metrics::{self, EventReport};

///
/// SorterEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SorterEvent<'a> {
    IndexRebuilt {
        generation: u64,
        tables: usize,
        components: usize,
        arcs: usize,
    },
    IndexRebuildFailed {
        problems: usize,
    },
    TablesSorted {
        tables: usize,
    },
    InstancesSorted {
        table: &'a str,
        objects: usize,
        arcs: usize,
    },
    InstanceCycle {
        table: &'a str,
        unresolved: usize,
    },
}

///
/// EventSink
///

pub trait EventSink: Send + Sync {
    fn record(&self, event: SorterEvent<'_>);
}

///
/// GlobalEventSink
/// Default sink that folds events into process-wide metrics state.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalEventSink;

impl EventSink for GlobalEventSink {
    fn record(&self, event: SorterEvent<'_>) {
        match event {
            SorterEvent::IndexRebuilt { generation, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.index_rebuilds = m.ops.index_rebuilds.saturating_add(1);
                    m.last_generation = m.last_generation.max(generation);
                });
            }

            SorterEvent::IndexRebuildFailed { problems } => {
                metrics::with_state_mut(|m| {
                    m.ops.index_rebuild_failures = m.ops.index_rebuild_failures.saturating_add(1);
                    m.ops.metadata_problems = m
                        .ops
                        .metadata_problems
                        .saturating_add(metrics::count(problems));
                });
            }

            SorterEvent::TablesSorted { tables } => {
                metrics::with_state_mut(|m| {
                    m.ops.table_sorts = m.ops.table_sorts.saturating_add(1);
                    m.ops.tables_sorted = m.ops.tables_sorted.saturating_add(metrics::count(tables));
                });
            }

            SorterEvent::InstancesSorted {
                table,
                objects,
                arcs,
            } => {
                let objects = metrics::count(objects);
                let arcs = metrics::count(arcs);

                metrics::with_state_mut(|m| {
                    m.ops.instance_sorts = m.ops.instance_sorts.saturating_add(1);
                    m.ops.objects_sorted = m.ops.objects_sorted.saturating_add(objects);
                    m.ops.dependency_arcs = m.ops.dependency_arcs.saturating_add(arcs);

                    let entry = m.tables.entry(table.to_string()).or_default();
                    entry.instance_sorts = entry.instance_sorts.saturating_add(1);
                    entry.objects_sorted = entry.objects_sorted.saturating_add(objects);
                    entry.dependency_arcs = entry.dependency_arcs.saturating_add(arcs);
                });
            }

            SorterEvent::InstanceCycle { table, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.instance_cycles = m.ops.instance_cycles.saturating_add(1);

                    let entry = m.tables.entry(table.to_string()).or_default();
                    entry.cycles = entry.cycles.saturating_add(1);
                });
            }
        }
    }
}

/// Snapshot the current metrics state for endpoint/test plumbing.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

///
/// TESTS
///
