use crate::model::TableName;
use std::fmt;
use thiserror::Error as ThisError;

///
/// SortError
///
/// Structured sorter error with a stable classification.
/// `Configuration` errors come from metadata or config and are fixed by
/// the caller; `Ordering` errors abort the enclosing flush.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct SortError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    pub detail: Option<ErrorDetail>,
}

impl SortError {
    #[must_use]
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a schema-origin configuration error carrying every
    /// metadata problem found in one build.
    pub(crate) fn metadata(problems: Vec<MetadataError>) -> Self {
        let message = format!(
            "invalid schema metadata: {}",
            problems
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        );

        Self {
            class: ErrorClass::Configuration,
            origin: ErrorOrigin::Schema,
            message,
            detail: Some(ErrorDetail::Metadata(problems)),
        }
    }

    /// Construct the flush-time error for a cycle among batch objects.
    pub(crate) fn instance_cycle(table: &str, unresolved: usize) -> Self {
        let err = OrderingError::Cycle {
            table: table.to_string(),
            unresolved,
        };

        Self {
            class: ErrorClass::Ordering,
            origin: ErrorOrigin::Instances,
            message: err.to_string(),
            detail: Some(ErrorDetail::Ordering(err)),
        }
    }

    /// Construct an index-origin internal error.
    pub(crate) fn index_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Index, message)
    }

    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.class, ErrorClass::Configuration)
    }

    #[must_use]
    pub const fn is_ordering(&self) -> bool {
        matches!(self.class, ErrorClass::Ordering)
    }

    /// Metadata problems, when this error came from a failed index build.
    #[must_use]
    pub fn metadata_problems(&self) -> &[MetadataError] {
        match &self.detail {
            Some(ErrorDetail::Metadata(problems)) => problems,
            _ => &[],
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{} metadata problem(s)", .0.len())]
    Metadata(Vec<MetadataError>),

    #[error("{0}")]
    Ordering(OrderingError),
}

///
/// MetadataError
///
/// One malformed piece of schema metadata found while building the
/// referential graph. Relationships carrying a problem are never silently
/// dropped; the whole build fails.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MetadataError {
    #[error("table '{table}' is declared more than once")]
    DuplicateTable { table: TableName },

    #[error("relationship '{table}.{relationship}' targets unknown table '{target}'")]
    UnknownTargetTable {
        table: TableName,
        relationship: String,
        target: TableName,
    },

    #[error("relationship '{table}.{relationship}' joins unknown attribute '{owner}.{attribute}'")]
    UnknownJoinAttribute {
        table: TableName,
        relationship: String,
        owner: TableName,
        attribute: String,
    },

    #[error("relationship '{table}.{relationship}' declares no join columns")]
    EmptyJoins {
        table: TableName,
        relationship: String,
    },
}

///
/// OrderingError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum OrderingError {
    #[error("cannot order objects of table '{table}': {unresolved} objects form a dependency cycle")]
    Cycle { table: String, unresolved: usize },
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    Ordering,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Ordering => "ordering",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Config,
    Schema,
    Index,
    Instances,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Schema => "schema",
            Self::Index => "index",
            Self::Instances => "instances",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
