//! Shared fixtures for unit tests.

use crate::{
    model::{RelationshipModel, SchemaModel, TableModel},
    object::{ObjectId, PersistentObject, RowSnapshot},
    obs::sink::{EventSink, SorterEvent},
};
use parking_lot::Mutex;

///
/// Schemas
///

/// CUSTOMER <- ORDER <- ORDER_LINE, declared child-first.
pub(crate) fn customer_order_schema() -> SchemaModel {
    SchemaModel::new()
        .table(
            TableModel::new("ORDER_LINE")
                .primary_key("ID")
                .attribute("ORDER_ID")
                .relationship(RelationshipModel::to_one("order", "ORDER").join("ORDER_ID", "ID")),
        )
        .table(
            TableModel::new("ORDER")
                .primary_key("ID")
                .attribute("CUSTOMER_ID")
                .relationship(
                    RelationshipModel::to_one("customer", "CUSTOMER").join("CUSTOMER_ID", "ID"),
                )
                .relationship(RelationshipModel::to_many("lines", "ORDER_LINE").join("ID", "ORDER_ID")),
        )
        .table(
            TableModel::new("CUSTOMER")
                .primary_key("ID")
                .relationship(RelationshipModel::to_many("orders", "ORDER").join("ID", "CUSTOMER_ID")),
        )
}

/// NODE with one reflexive `parent` relationship.
pub(crate) fn node_schema() -> SchemaModel {
    SchemaModel::new().table(node_table())
}

pub(crate) fn node_table() -> TableModel {
    TableModel::new("NODE")
        .primary_key("ID")
        .attribute("PARENT_ID")
        .relationship(RelationshipModel::to_one("parent", "NODE").join("PARENT_ID", "ID"))
        .relationship(RelationshipModel::to_many("children", "NODE").join("ID", "PARENT_ID"))
}

/// NODE with two reflexive relationships, `parent` and `mentor`.
pub(crate) fn mentored_node_schema() -> SchemaModel {
    SchemaModel::new().table(
        node_table()
            .attribute("MENTOR_ID")
            .relationship(RelationshipModel::to_one("mentor", "NODE").join("MENTOR_ID", "ID")),
    )
}

///
/// TestObject
///

#[derive(Clone, Debug)]
pub(crate) struct TestObject {
    pub(crate) id: ObjectId,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) mentor: Option<ObjectId>,
    pub(crate) row: Option<RowSnapshot>,
}

impl TestObject {
    /// Persisted NODE row with an optional in-memory parent.
    pub(crate) fn node(id: i64, parent: Option<i64>) -> Self {
        Self {
            id: node_id(id),
            parent: parent.map(node_id),
            mentor: None,
            row: None,
        }
    }

    /// Unsaved NODE object with an optional in-memory parent.
    pub(crate) fn new_node(serial: u64, parent: Option<ObjectId>) -> Self {
        Self {
            id: ObjectId::temporary("NODE", serial),
            parent,
            mentor: None,
            row: None,
        }
    }

    pub(crate) fn with_mentor(mut self, mentor: i64) -> Self {
        self.mentor = Some(node_id(mentor));
        self
    }

    pub(crate) fn with_row(mut self, row: RowSnapshot) -> Self {
        self.row = Some(row);
        self
    }
}

impl PersistentObject for TestObject {
    fn object_id(&self) -> &ObjectId {
        &self.id
    }

    fn related(&self, relationship: &str) -> Option<ObjectId> {
        match relationship {
            "parent" => self.parent.clone(),
            "mentor" => self.mentor.clone(),
            _ => None,
        }
    }

    fn current_row(&self) -> Option<RowSnapshot> {
        self.row.clone()
    }
}

pub(crate) fn node_id(id: i64) -> ObjectId {
    ObjectId::permanent("NODE", [("ID", id)])
}

/// Snapshot row of a persisted NODE pointing at `parent`.
pub(crate) fn node_row(id: i64, parent: i64) -> RowSnapshot {
    RowSnapshot::new().with("ID", id).with("PARENT_ID", parent)
}

/// Ids of `objects`, in order.
pub(crate) fn ids(objects: &[TestObject]) -> Vec<ObjectId> {
    objects.iter().map(|object| object.id.clone()).collect()
}

///
/// CaptureSink
///
/// Records sorter events for assertions without touching global metrics.
///

#[derive(Debug, Default)]
pub(crate) struct CaptureSink {
    pub(crate) generations: Mutex<Vec<u64>>,
    pub(crate) rebuild_failures: Mutex<Vec<usize>>,
    pub(crate) table_sorts: Mutex<Vec<usize>>,
    pub(crate) instance_sorts: Mutex<Vec<(String, usize, usize)>>,
    pub(crate) cycles: Mutex<Vec<(String, usize)>>,
}

impl EventSink for CaptureSink {
    fn record(&self, event: SorterEvent<'_>) {
        match event {
            SorterEvent::IndexRebuilt { generation, .. } => self.generations.lock().push(generation),
            SorterEvent::IndexRebuildFailed { problems } => {
                self.rebuild_failures.lock().push(problems);
            }
            SorterEvent::TablesSorted { tables } => self.table_sorts.lock().push(tables),
            SorterEvent::InstancesSorted {
                table,
                objects,
                arcs,
            } => self
                .instance_sorts
                .lock()
                .push((table.to_string(), objects, arcs)),
            SorterEvent::InstanceCycle { table, unresolved } => {
                self.cycles.lock().push((table.to_string(), unresolved));
            }
        }
    }
}
