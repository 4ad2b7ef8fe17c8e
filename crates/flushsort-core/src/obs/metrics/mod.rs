use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    sync::LazyLock,
    time::{SystemTime, UNIX_EPOCH},
};

///
/// EventState
/// Process-wide, in-memory sorter counters.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub tables: BTreeMap<String, TableCounters>,
    /// Generation of the most recently published index.
    pub last_generation: u64,
    pub since_ms: u64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            tables: BTreeMap::new(),
            last_generation: 0,
            since_ms: now_millis(),
        }
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Index lifecycle
    pub index_rebuilds: u64,
    pub index_rebuild_failures: u64,
    pub metadata_problems: u64,

    // Table ordering
    pub table_sorts: u64,
    pub tables_sorted: u64,

    // Instance ordering
    pub instance_sorts: u64,
    pub objects_sorted: u64,
    pub dependency_arcs: u64,
    pub instance_cycles: u64,
}

///
/// TableCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TableCounters {
    pub instance_sorts: u64,
    pub objects_sorted: u64,
    pub dependency_arcs: u64,
    pub cycles: u64,
}

static EVENT_STATE: LazyLock<Mutex<EventState>> =
    LazyLock::new(|| Mutex::new(EventState::default()));

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    f(&EVENT_STATE.lock())
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    f(&mut EVENT_STATE.lock())
}

/// Serializes tests that reset or assert on shared metrics state.
#[cfg(test)]
pub(crate) static TEST_LOCK: Mutex<()> = Mutex::new(());

/// Reset all counters and restart the window.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Saturating `usize` to counter conversion.
pub(crate) fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    /// Ephemeral runtime counters since `since_ms`.
    pub counters: Option<EventState>,
    /// Per-table counters and averages.
    pub table_counters: Vec<TableSummary>,
}

///
/// TableSummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TableSummary {
    pub table: String,
    pub instance_sorts: u64,
    pub objects_sorted: u64,
    pub avg_objects_per_sort: f64,
    pub dependency_arcs: u64,
    pub cycles: u64,
}

/// Build a metrics report ordered by busiest table first.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub(crate) fn report() -> EventReport {
    let snap = with_state(Clone::clone);

    let mut table_counters: Vec<TableSummary> = snap
        .tables
        .iter()
        .map(|(table, counters)| TableSummary {
            table: table.clone(),
            instance_sorts: counters.instance_sorts,
            objects_sorted: counters.objects_sorted,
            avg_objects_per_sort: if counters.instance_sorts > 0 {
                counters.objects_sorted as f64 / counters.instance_sorts as f64
            } else {
                0.0
            },
            dependency_arcs: counters.dependency_arcs,
            cycles: counters.cycles,
        })
        .collect();

    table_counters.sort_by(|a, b| {
        b.objects_sorted
            .cmp(&a.objects_sorted)
            .then_with(|| a.table.cmp(&b.table))
    });

    EventReport {
        counters: Some(snap),
        table_counters,
    }
}

///
/// TESTS
///

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn count_saturates() {
        assert_eq!(count(7), 7);
        assert_eq!(count(usize::MAX), u64::try_from(usize::MAX).unwrap_or(u64::MAX));
    }

    #[test]
    fn report_averages_per_table() {
        let _guard = TEST_LOCK.lock();
        with_state_mut(|m| {
            m.tables.insert(
                "metrics::tests::AVG".to_string(),
                TableCounters {
                    instance_sorts: 4,
                    objects_sorted: 10,
                    ..Default::default()
                },
            );
        });

        let report = report();
        let summary = report
            .table_counters
            .iter()
            .find(|summary| summary.table == "metrics::tests::AVG")
            .expect("table summary should be present");
        assert_eq!(summary.avg_objects_per_sort, 2.5);
        assert!(report.counters.is_some());
    }

    #[test]
    fn report_serializes_to_json() {
        let json = serde_json::to_string(&report()).expect("report should serialize");
        assert!(json.contains("\"table_counters\""));
        assert!(json.contains("\"index_rebuilds\""));
    }
}
