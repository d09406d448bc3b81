//! Query engine behind `teamql`.
//!
//! Builds typed SQL without touching a store: expressions, the predicate
//! combinator, query descriptors, projections and bulk mutations. Running a
//! statement goes through the [`Executor`] trait.

pub mod context;
pub mod conversions;
pub mod entity;
pub mod error;
pub mod executor;
pub mod expr;
pub mod predicate;
pub mod projection;
pub mod query;
pub mod row;
pub mod schema;
pub mod sql;
mod tracing;
pub mod types;
pub mod value;

// Re-export key types and traits
pub use context::IdentityMap;
pub use conversions::ToSQL;
pub use entity::{Entity, EntityTable};
pub use error::{BuildError, QueryError, Result, Stage, StoreError};
pub use executor::{Executor, Statement};
pub use schema::{Column, Link, OrderBy, RelationPath, Source, Table};
pub use sql::{SQL, SQLChunk, Token};
pub use value::{FromValue, SqlKind, Value};

/// Everything needed to write queries.
pub mod prelude {
    pub use crate::context::IdentityMap;
    pub use crate::entity::{Entity, EntityTable};
    pub use crate::error::{BuildError, QueryError};
    pub use crate::executor::Executor;
    pub use crate::expr::*;
    pub use crate::predicate::{IntoPredicate, PredicateBuilder, all_of, any_of};
    pub use crate::projection::{
        DeclaredProjection, Projection, Projections, TupleRow, optional,
    };
    pub use crate::query::{
        Derived, Mutation, QueryResults, SelectQuery, asc, delete, desc, exists, in_subquery,
        not_exists, select, select_distinct, select_from, update,
    };
    pub use crate::schema::{Column, Table};
    pub use crate::types::{Any, BigInt, Bool, Double, Int, Text};
    pub use crate::{field_target, setter_target, tuple};
}
