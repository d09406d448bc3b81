//! Nested queries: scalar subqueries, membership, existence and derived tables.
//!
//! A nested query may reference columns of the enclosing query (a correlated
//! subquery). Those references are checked when the enclosing query is built,
//! together with the rule that a nested query declares its own aliases:
//!
//! ```ignore
//! let member_sub = MemberTable::aliased("memberSub");
//! select_from(member).r#where(eq(
//!     member.age,
//!     select(max(member_sub.age)).from(member_sub).as_expr(),
//! ))
//! ```

use crate::error::BuildError;
use crate::expr::{Expr, Null, Predicate, SQLExpr};
use crate::projection::Projection;
use crate::schema::{Column, Source};
use crate::sql::{SQL, Token};
use crate::types::{Compatible, DataType};

use super::{SelectQuery, Sourced};

impl<P: Projection, S> SelectQuery<P, S> {
    fn nested(&self) -> SQL {
        SQL::subquery(self.render(), self.scope())
    }
}

impl<P: Projection + Expr, S> SelectQuery<P, S> {
    /// This query as a scalar expression, typed by its single projected
    /// expression. NULL when the query yields no row.
    pub fn as_expr(&self) -> SQLExpr<P::SQLType, Null> {
        SQLExpr::new(self.nested())
    }
}

/// `expr IN (SELECT ...)`
pub fn in_subquery<E, Q, S>(expr: E, query: SelectQuery<Q, S>) -> Predicate
where
    E: Expr,
    Q: Projection + Expr,
    E::SQLType: Compatible<Q::SQLType>,
{
    SQLExpr::new(expr.into_sql().push(Token::IN).append(query.nested()))
}

/// `EXISTS (SELECT ...)`
pub fn exists<P: Projection, S>(query: SelectQuery<P, S>) -> Predicate {
    SQLExpr::new(SQL::token(Token::EXISTS).append(query.nested()))
}

/// `NOT EXISTS (SELECT ...)`
pub fn not_exists<P: Projection, S>(query: SelectQuery<P, S>) -> Predicate {
    SQLExpr::new(
        SQL::token(Token::NOT)
            .push(Token::EXISTS)
            .append(query.nested()),
    )
}

/// A query used as a join target or source: `(SELECT ...) AS "alias"`.
#[derive(Debug, Clone)]
pub struct Derived {
    sql: SQL,
    scope: Vec<&'static str>,
    alias: &'static str,
}

impl Derived {
    /// Wraps a complete, uncorrelated query.
    pub fn new<P: Projection>(
        query: SelectQuery<P, Sourced>,
        alias: &'static str,
    ) -> Result<Self, BuildError> {
        let sql = query.build()?;
        let scope = query.scope();
        if scope.contains(&alias) {
            return Err(BuildError::DuplicateAlias { alias });
        }
        Ok(Self { sql, scope, alias })
    }

    /// A column of the derived table, by its name or alias in the inner select.
    ///
    /// Nullable: the derived table may be on the outer side of a join.
    pub fn col<T: DataType>(&self, name: &'static str) -> Column<T, Null> {
        Column::new(self.alias, name)
    }
}

impl Source for Derived {
    fn source_sql(&self) -> SQL {
        SQL::subquery(self.sql.clone(), self.scope.clone()).alias(self.alias)
    }

    fn source_alias(&self) -> &'static str {
        self.alias
    }
}
