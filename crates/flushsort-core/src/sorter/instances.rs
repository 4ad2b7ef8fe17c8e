use crate::{
    config::SorterConfig,
    error::SortError,
    model::RelationshipModel,
    object::{ObjectGraph, ObjectId, PersistentObject, SnapshotCache},
    obs::sink::{EventSink, SorterEvent},
    sorter::SorterIndex,
};
use flushsort_graph::{CycleError, Digraph, IndegreeTopologicalSort};
use std::collections::HashMap;

///
/// InstanceContext
///
/// Persistence-layer collaborators consulted while resolving masters of
/// objects whose reflexive relationship is unset in memory.
///

pub struct InstanceContext<'a, O> {
    pub snapshots: &'a dyn SnapshotCache,
    pub objects: &'a dyn ObjectGraph<O>,
}

impl<'a, O> InstanceContext<'a, O> {
    #[must_use]
    pub const fn new(snapshots: &'a dyn SnapshotCache, objects: &'a dyn ObjectGraph<O>) -> Self {
        Self { snapshots, objects }
    }
}

///
/// InstanceSorter
///
/// Orders one flush batch of same-table objects so every master precedes
/// the objects that reference it through a reflexive relationship.
///

pub(crate) struct InstanceSorter<'a> {
    pub(crate) index: &'a SorterIndex,
    pub(crate) config: &'a SorterConfig,
    pub(crate) sink: &'a dyn EventSink,
}

impl InstanceSorter<'_> {
    pub(crate) fn sort<O: PersistentObject>(
        &self,
        table: &str,
        objects: &mut Vec<O>,
        delete_order: bool,
        ctx: &InstanceContext<'_, O>,
    ) -> Result<(), SortError> {
        let relationships = self.index.reflexive_relationships(table);
        if relationships.is_empty() || objects.is_empty() {
            return Ok(());
        }

        let (mut order, arcs) = match self.sequence(relationships, objects, ctx) {
            Ok(sequenced) => sequenced,
            Err(CycleError { unresolved }) => {
                self.sink.record(SorterEvent::InstanceCycle { table, unresolved });
                tracing::warn!(table, unresolved, "batch objects form a dependency cycle");

                return Err(SortError::instance_cycle(table, unresolved));
            }
        };

        if delete_order {
            order.reverse();
        }
        apply_order(objects, order);

        self.sink.record(SorterEvent::InstancesSorted {
            table,
            objects: objects.len(),
            arcs,
        });
        tracing::debug!(table, objects = objects.len(), arcs, delete_order, "sorted batch objects");

        Ok(())
    }

    // sequence
    // batch positions in master-first order, plus the arc count
    fn sequence<O: PersistentObject>(
        &self,
        relationships: &[RelationshipModel],
        objects: &[O],
        ctx: &InstanceContext<'_, O>,
    ) -> Result<(Vec<usize>, usize), CycleError> {
        let mut positions: HashMap<&ObjectId, usize> = HashMap::with_capacity(objects.len());
        for (position, object) in objects.iter().enumerate() {
            positions.entry(object.object_id()).or_insert(position);
        }

        let mut graph: Digraph<usize, ()> = Digraph::with_capacity(objects.len());
        for position in 0..objects.len() {
            graph.add_vertex(position);
        }

        for relationship in relationships {
            for (dependent, object) in objects.iter().enumerate() {
                let Some(master) = self.resolve_master(object, relationship, ctx) else {
                    continue;
                };

                // masters outside the batch and self references impose nothing
                match positions.get(&master) {
                    Some(&origin) if origin != dependent => {
                        graph.put_arc(origin, dependent, ());
                    }
                    _ => {}
                }
            }
        }

        let order = IndegreeTopologicalSort::new(&graph)
            .map(|step| step.copied())
            .collect::<Result<Vec<_>, _>>()?;

        Ok((order, graph.size()))
    }

    // resolve_master
    // in-memory reference first, then the last persisted row for
    // permanent objects; new objects without a reference have no master
    fn resolve_master<O: PersistentObject>(
        &self,
        object: &O,
        relationship: &RelationshipModel,
        ctx: &InstanceContext<'_, O>,
    ) -> Option<ObjectId> {
        if let Some(master) = object.related(&relationship.name) {
            return Some(master);
        }

        let id = object.object_id();
        if id.is_temporary() || !self.config.resolve_from_snapshots {
            return None;
        }

        let row = ctx.snapshots.snapshot(id).or_else(|| {
            self.config
                .current_row_fallback
                .then(|| object.current_row())
                .flatten()
        })?;
        let master_id = row.target_id(relationship)?;

        ctx.objects
            .registered(&master_id)
            .map(|master| master.object_id().clone())
    }
}

// apply_order
// rearranges `objects` so position i holds the element at order[i]
fn apply_order<O>(objects: &mut Vec<O>, order: Vec<usize>) {
    let mut slots: Vec<Option<O>> = objects.drain(..).map(Some).collect();

    objects.extend(
        order
            .into_iter()
            .filter_map(|position| slots.get_mut(position).and_then(Option::take)),
    );
}

///
/// TESTS
///
