//! Live-object seams used by per-batch instance ordering.
//!
//! The persistence layer owns object identity, the row-snapshot cache and
//! the live object graph; the sorter only reads them through the traits
//! below.

use crate::model::{RelationshipModel, TableName};
use derive_more::{Deref, Display};
use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

///
/// Value
///
/// Scalar column value as stored in a row snapshot or primary key.
///

#[derive(Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Value {
    #[display("null")]
    Null,
    Bool(bool),
    Int(i64),
    #[display("'{_0}'")]
    Text(String),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

///
/// ObjectKey
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ObjectKey {
    /// Identity of an object that has never been persisted.
    Temporary(u64),
    /// Primary-key column values of a persisted row.
    Permanent(BTreeMap<String, Value>),
}

///
/// ObjectId
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ObjectId {
    pub table: TableName,
    pub key: ObjectKey,
}

impl ObjectId {
    #[must_use]
    pub fn temporary(table: impl Into<TableName>, serial: u64) -> Self {
        Self {
            table: table.into(),
            key: ObjectKey::Temporary(serial),
        }
    }

    #[must_use]
    pub fn permanent<K, V>(table: impl Into<TableName>, key: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            table: table.into(),
            key: ObjectKey::Permanent(
                key.into_iter()
                    .map(|(column, value)| (column.into(), value.into()))
                    .collect(),
            ),
        }
    }

    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        matches!(self.key, ObjectKey::Temporary(_))
    }
}

///
/// RowSnapshot
///
/// Column values of a row as last known to the persistence layer.
///

#[derive(Clone, Debug, Default, Deref, Eq, PartialEq)]
pub struct RowSnapshot(BTreeMap<String, Value>);

impl RowSnapshot {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    /// Identity of the row `relationship` points at, read from this row's
    /// foreign-key columns. `None` when any join column is absent or null.
    #[must_use]
    pub fn target_id(&self, relationship: &RelationshipModel) -> Option<ObjectId> {
        let mut key = BTreeMap::new();
        for join in &relationship.joins {
            let value = self.0.get(&join.source).filter(|value| !value.is_null())?;
            key.insert(join.target.clone(), value.clone());
        }
        if key.is_empty() {
            return None;
        }

        Some(ObjectId {
            table: relationship.target.clone(),
            key: ObjectKey::Permanent(key),
        })
    }
}

impl<K, V> FromIterator<(K, V)> for RowSnapshot
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        )
    }
}

///
/// PersistentObject
///
/// A live, managed domain object participating in a flush.
///

pub trait PersistentObject {
    fn object_id(&self) -> &ObjectId;

    /// Identity currently held in memory by a to-one relationship, or
    /// `None` when the relationship is unset or not yet faulted in.
    fn related(&self, relationship: &str) -> Option<ObjectId>;

    /// Column values reflecting the object's in-memory state, when the
    /// object can produce them.
    fn current_row(&self) -> Option<RowSnapshot> {
        None
    }
}

///
/// SnapshotCache
///
/// Last known persisted rows. Lookups must not touch transaction state.
///

pub trait SnapshotCache {
    fn snapshot(&self, id: &ObjectId) -> Option<RowSnapshot>;
}

impl<S: BuildHasher> SnapshotCache for HashMap<ObjectId, RowSnapshot, S> {
    fn snapshot(&self, id: &ObjectId) -> Option<RowSnapshot> {
        self.get(id).cloned()
    }
}

///
/// NoSnapshots
///
/// Cache that never has a row.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoSnapshots;

impl SnapshotCache for NoSnapshots {
    fn snapshot(&self, _: &ObjectId) -> Option<RowSnapshot> {
        None
    }
}

///
/// ObjectGraph
///
/// Lookup of currently managed instances by identity.
///

pub trait ObjectGraph<O> {
    fn registered(&self, id: &ObjectId) -> Option<&O>;
}

impl<O, S: BuildHasher> ObjectGraph<O> for HashMap<ObjectId, O, S> {
    fn registered(&self, id: &ObjectId) -> Option<&O> {
        self.get(id)
    }
}

///
/// TESTS
///
