//! # teamql
//!
//! Typed queries over a member/team entity graph, backed by SQLite.
//!
//! ## Quick Start
//!
//! ```rust
//! use teamql::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::open_in_memory()?;
//! session.create_schema()?;
//!
//! let mut team = Team::new("teamA");
//! session.persist(&mut team)?;
//! session.persist(&mut Member::with_team("member1", 10, &team))?;
//!
//! let member = MemberTable::new();
//! let found = select_from(member)
//!     .r#where(eq(member.username, "member1"))
//!     .fetch_one(&session)?;
//! assert_eq!(found.map(|m| m.age()), Some(10));
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! | Feature    | Default | Enables                                   |
//! |------------|---------|-------------------------------------------|
//! | `rusqlite` | yes     | [`Session`] over bundled SQLite           |
//! | `tracing`  | yes     | statement, overwrite and staleness events |

pub mod config;
pub mod entity;
#[cfg(feature = "rusqlite")]
pub mod session;

// =============================================================================
// Root-level exports
// =============================================================================

/// Result type for query operations
pub use teamql_core::error::Result;

pub use config::SessionConfig;
pub use entity::{Association, Member, MemberTable, Team, TeamTable};
#[cfg(feature = "rusqlite")]
pub use session::{Session, SessionError, Store};

/// Error types
pub mod error {
    pub use teamql_core::error::{BuildError, QueryError, Stage, StoreError};
}

/// The query engine, for code that goes beyond the prelude.
///
/// ```rust,ignore
/// use teamql::core::sql::SQL;
/// use teamql::core::expr::{coalesce, template};
/// ```
pub mod core {
    pub use teamql_core::{
        Column, Entity, EntityTable, Executor, IdentityMap, Link, OrderBy, RelationPath, SQL,
        SQLChunk, Source, Statement, Table, ToSQL, Token, Value,
    };

    pub use teamql_core::{
        context, entity, executor, expr, predicate, projection, query, row, schema, sql, types,
        value,
    };
}

pub use teamql_core::{field_target, setter_target, tuple};

/// Everything needed to write queries against the member/team model.
pub mod prelude {
    pub use teamql_core::prelude::*;

    pub use crate::entity::{Association, Member, MemberTable, Team, TeamTable};
    #[cfg(feature = "rusqlite")]
    pub use crate::session::{Session, SessionError};
    pub use crate::config::SessionConfig;
}
