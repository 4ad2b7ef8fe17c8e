//! Entity dependency sorter.
//!
//! Table ordering comes from an immutable [`SorterIndex`] rebuilt lazily
//! after every schema change. Readers check a dirty flag and load the
//! published index without locking; only a dirty reader takes the rebuild
//! lock, re-checks, and publishes a fresh index by swapping the `Arc`.
//! Published indexes are never mutated.

mod index;
mod instances;


pub use index::{ComponentRecord, IndexStats, SorterIndex};
pub use instances::InstanceContext;

use crate::{
    config::SorterConfig,
    error::SortError,
    model::SchemaProvider,
    object::PersistentObject,
    obs::sink::{EventSink, GlobalEventSink, SorterEvent},
};
use arc_swap::ArcSwap;
use instances::InstanceSorter;
use parking_lot::{Mutex, RwLock};
use std::{
    cmp::Ordering,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering as AtomicOrdering},
    },
};

///
/// EntitySorter
///
/// Shared, thread-safe entry point used right before SQL generation.
///

pub struct EntitySorter {
    config: SorterConfig,
    schema: RwLock<Arc<dyn SchemaProvider>>,
    dirty: AtomicBool,
    rebuild: Mutex<()>,
    index: ArcSwap<SorterIndex>,
    sink: Arc<dyn EventSink>,
}

impl EntitySorter {
    /// Sorter over `schema` with default config. The index is built on
    /// first use.
    #[must_use]
    pub fn new(schema: Arc<dyn SchemaProvider>) -> Self {
        Self {
            config: SorterConfig::default(),
            schema: RwLock::new(schema),
            dirty: AtomicBool::new(true),
            rebuild: Mutex::new(()),
            index: ArcSwap::from_pointee(SorterIndex::empty()),
            sink: Arc::new(GlobalEventSink),
        }
    }

    /// Sorter with explicit config; builds immediately when `eager_index`
    /// is set.
    pub fn with_config(
        schema: Arc<dyn SchemaProvider>,
        config: SorterConfig,
    ) -> Result<Self, SortError> {
        let sorter = Self {
            config,
            ..Self::new(schema)
        };
        if sorter.config.eager_index {
            sorter.index_sorter()?;
        }

        Ok(sorter)
    }

    /// Route sorter events to `sink` instead of the global metrics state.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &SorterConfig {
        &self.config
    }

    /// Install new schema metadata. The current index stays published
    /// until the next rebuild replaces it.
    pub fn set_schema(&self, schema: Arc<dyn SchemaProvider>) -> Result<(), SortError> {
        {
            let _rebuild = self.rebuild.lock();
            *self.schema.write() = schema;
            self.dirty.store(true, AtomicOrdering::Release);
        }
        if self.config.eager_index {
            self.index_sorter()?;
        }

        Ok(())
    }

    /// Mark the index stale so the next reader rebuilds it.
    pub fn mark_dirty(&self) {
        let _rebuild = self.rebuild.lock();
        self.dirty.store(true, AtomicOrdering::Release);
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(AtomicOrdering::Acquire)
    }

    /// Rebuild the index now, regardless of the dirty flag.
    pub fn index_sorter(&self) -> Result<(), SortError> {
        let _rebuild = self.rebuild.lock();
        self.dirty.store(true, AtomicOrdering::Release);
        self.rebuild_locked()
    }

    /// Currently published index, rebuilding first when stale.
    pub fn index(&self) -> Result<Arc<SorterIndex>, SortError> {
        if self.dirty.load(AtomicOrdering::Acquire) {
            let _rebuild = self.rebuild.lock();
            if self.dirty.load(AtomicOrdering::Acquire) {
                self.rebuild_locked()?;
            }
        }

        Ok(self.index.load_full())
    }

    // rebuild_locked
    // caller holds the rebuild lock; a failed build leaves the flag set
    fn rebuild_locked(&self) -> Result<(), SortError> {
        let generation = self.index.load().generation().saturating_add(1);
        let schema = Arc::clone(&self.schema.read());

        let index = match SorterIndex::build(schema.as_ref(), generation) {
            Ok(index) => index,
            Err(err) => {
                self.sink.record(SorterEvent::IndexRebuildFailed {
                    problems: err.metadata_problems().len(),
                });
                tracing::warn!(error = %err, "rejected schema metadata");

                return Err(err);
            }
        };

        let stats = index.stats();
        self.index.store(Arc::new(index));
        self.dirty.store(false, AtomicOrdering::Release);

        self.sink.record(SorterEvent::IndexRebuilt {
            generation,
            tables: stats.tables,
            components: stats.components,
            arcs: stats.arcs,
        });
        tracing::debug!(
            generation,
            tables = stats.tables,
            components = stats.components,
            arcs = stats.arcs,
            "rebuilt table dependency index"
        );

        Ok(())
    }

    /// Insert-order comparison of two tables.
    pub fn compare(&self, a: &str, b: &str) -> Result<Ordering, SortError> {
        Ok(self.index()?.compare(a, b))
    }

    /// Order table names so referenced tables come first.
    pub fn sort_for_insert<T: AsRef<str>>(&self, tables: &mut [T]) -> Result<(), SortError> {
        self.sort_for_insert_by(tables, T::as_ref)
    }

    /// Exact reverse of [`Self::sort_for_insert`].
    pub fn sort_for_delete<T: AsRef<str>>(&self, tables: &mut [T]) -> Result<(), SortError> {
        self.sort_for_delete_by(tables, T::as_ref)
    }

    /// Stable insert-order sort of arbitrary records keyed by table name.
    pub fn sort_for_insert_by<T>(
        &self,
        items: &mut [T],
        key: impl Fn(&T) -> &str,
    ) -> Result<(), SortError> {
        let index = self.index()?;
        items.sort_by(|a, b| index.compare(key(a), key(b)));
        self.sink.record(SorterEvent::TablesSorted {
            tables: items.len(),
        });

        Ok(())
    }

    /// Stable delete-order sort of arbitrary records keyed by table name.
    pub fn sort_for_delete_by<T>(
        &self,
        items: &mut [T],
        key: impl Fn(&T) -> &str,
    ) -> Result<(), SortError> {
        let index = self.index()?;
        items.sort_by(|a, b| index.compare(key(b), key(a)));
        self.sink.record(SorterEvent::TablesSorted {
            tables: items.len(),
        });

        Ok(())
    }

    pub fn is_reflexive(&self, table: &str) -> Result<bool, SortError> {
        Ok(self.index()?.is_reflexive(table))
    }

    /// Reorder one flush batch of `table` objects so masters precede their
    /// dependents (or follow them, for `delete_order`). Batches of tables
    /// without reflexive relationships are left untouched.
    pub fn sort_instances<O: PersistentObject>(
        &self,
        table: &str,
        objects: &mut Vec<O>,
        delete_order: bool,
        ctx: &InstanceContext<'_, O>,
    ) -> Result<(), SortError> {
        let index = self.index()?;

        InstanceSorter {
            index: &index,
            config: &self.config,
            sink: self.sink.as_ref(),
        }
        .sort(table, objects, delete_order, ctx)
    }
}

impl fmt::Debug for EntitySorter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySorter")
            .field("config", &self.config)
            .field("dirty", &self.is_dirty())
            .field("generation", &self.index.load().generation())
            .finish_non_exhaustive()
    }
}
