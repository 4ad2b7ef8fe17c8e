//! Core runtime for flushsort: schema metadata, live-object seams, the
//! entity dependency sorter, and the error/config/obs plumbing around it.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod error;
pub mod model;
pub mod object;
pub mod obs;
pub mod sorter;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or config types are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{
            AttributeModel, JoinModel, RelationshipModel, SchemaModel, SchemaProvider, TableModel,
            TableName,
        },
        object::{ObjectGraph, ObjectId, ObjectKey, PersistentObject, RowSnapshot, SnapshotCache, Value},
        sorter::{EntitySorter, InstanceContext, SorterIndex},
    };
}
