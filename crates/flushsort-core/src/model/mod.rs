//! Schema metadata consumed by the sorter.
//!
//! The surrounding persistence layer owns schema loading; it exposes tables
//! through [`SchemaProvider`]. [`SchemaModel`] is the in-memory provider.

mod relationship;
mod table;

pub use relationship::{JoinModel, RelationshipModel};
pub use table::{AttributeModel, TableModel};

use derive_more::{Deref, Display};
use std::{borrow::Borrow, sync::Arc};

///
/// TableName
///
/// Cheaply clonable table identity. Compares, hashes, and borrows as the
/// underlying `str`, so maps keyed by `TableName` accept `&str` lookups.
///

#[derive(Clone, Debug, Deref, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[deref(forward)]
pub struct TableName(Arc<str>);

impl TableName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TableName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TableName {
    fn from(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl From<String> for TableName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

///
/// SchemaProvider
///
/// Read interface over the persistence layer's table metadata.
///

pub trait SchemaProvider: Send + Sync {
    fn tables(&self) -> Box<dyn Iterator<Item = &TableModel> + '_>;
}

///
/// SchemaModel
///

#[derive(Clone, Debug, Default)]
pub struct SchemaModel {
    pub tables: Vec<TableModel>,
}

impl SchemaModel {
    #[must_use]
    pub const fn new() -> Self {
        Self { tables: Vec::new() }
    }

    #[must_use]
    pub fn table(mut self, table: TableModel) -> Self {
        self.tables.push(table);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TableModel> {
        self.tables.iter().find(|table| table.name.as_str() == name)
    }
}

impl SchemaProvider for SchemaModel {
    fn tables(&self) -> Box<dyn Iterator<Item = &TableModel> + '_> {
        Box::new(self.tables.iter())
    }
}

impl FromIterator<TableModel> for SchemaModel {
    fn from_iter<I: IntoIterator<Item = TableModel>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}
