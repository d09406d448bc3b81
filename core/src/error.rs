use std::fmt;

use thiserror::Error;

use crate::value::SqlKind;

/// Error type returned by an [`Executor`](crate::Executor) implementation.
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A contract violation detected while a query is being built.
///
/// These never reach the store: the offending builder call or projection
/// constructor returns them before anything is executed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A selected expression cannot be stored in the projection slot
    #[error("type mismatch for `{slot}`: expected {expected}, found {found}")]
    TypeMismatch {
        slot: String,
        expected: SqlKind,
        found: SqlKind,
    },

    /// A possibly-NULL expression is bound to a slot that cannot hold NULL
    #[error("`{expression}` may be NULL but `{slot}` is not optional")]
    NullIntoRequired { slot: String, expression: String },

    /// A selection that cannot decode NULL reads the outer side of a left join
    #[error("`{expression}` reads left-joined `{alias}` and may be NULL; wrap it in `optional`")]
    LeftJoinedSelection {
        alias: &'static str,
        expression: String,
    },

    /// The natural name of a selected expression matches no property of the target
    #[error("`{expression}` does not match a property of {target}; give it an explicit alias")]
    AliasRequired { expression: String, target: &'static str },

    /// An explicit alias names a property the target does not have
    #[error("{target} has no property named `{property}`")]
    UnknownProperty {
        property: &'static str,
        target: &'static str,
    },

    /// A clause references a source that is not part of the query
    #[error("`{alias}` is referenced before it was selected from or joined")]
    UnjoinedSource { alias: &'static str },

    /// The same alias is declared twice in one scope
    #[error("alias `{alias}` is already in use; give each occurrence a distinct alias")]
    DuplicateAlias { alias: &'static str },

    /// A join modifier was called with no join to modify
    #[error("`{operation}` requires a preceding join")]
    MissingJoin { operation: &'static str },

    /// Eager fetching was requested for a join the projection cannot populate
    #[error("join on `{alias}` cannot be fetched into the selected projection")]
    FetchJoinTarget { alias: &'static str },

    /// A function template is malformed or references a missing argument
    #[error("invalid template `{pattern}`: {reason}")]
    Template {
        pattern: &'static str,
        reason: String,
    },

    /// An update without any assignment
    #[error("update of `{table}` has no assignments")]
    EmptyAssignments { table: &'static str },
}

/// The point at which a statement was handed to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Count,
    Mutation,
    Persist,
    Schema,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Fetch => "fetch",
            Stage::Count => "count",
            Stage::Mutation => "mutation",
            Stage::Persist => "persist",
            Stage::Schema => "schema",
        })
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    /// The query was rejected before execution
    #[error(transparent)]
    Build(#[from] BuildError),

    /// A single-result fetch matched more than one row
    #[error("expected at most one row, found {rows}")]
    NonUniqueResult { rows: usize },

    /// The store failed to execute a statement
    #[error("{stage} failed for `{sql}`: {source}")]
    Store {
        stage: Stage,
        sql: String,
        #[source]
        source: StoreError,
    },

    /// A returned value does not fit its projection slot
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// An entity refers to a related entity that was never persisted
    #[error("`{entity}.{relation}` refers to an entity that has not been persisted")]
    UnsavedReference {
        entity: &'static str,
        relation: &'static str,
    },
}

impl QueryError {
    pub fn store(stage: Stage, sql: impl Into<String>, source: impl Into<StoreError>) -> Self {
        QueryError::Store {
            stage,
            sql: sql.into(),
            source: source.into(),
        }
    }
}

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;
