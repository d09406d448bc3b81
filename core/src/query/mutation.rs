//! Bulk UPDATE and DELETE.
//!
//! Bulk statements go straight to the store and do not pass through the
//! identity map, so entities already cached for the table may now be stale.
//! Executing one returns a [`Stale`] token that must be resolved by either
//! evicting the cached entities or explicitly keeping them:
//!
//! ```ignore
//! let stale = update(member)
//!     .set(member.age, member.age + 1)
//!     .r#where(lt(member.age, 20))
//!     .execute(&store, &mut cache)?;
//! assert_eq!(stale.affected(), 1);
//! stale.invalidate();
//! ```

use crate::context::IdentityMap;
use crate::conversions::ToSQL;
use crate::error::{BuildError, QueryError, Stage};
use crate::executor::{Executor, Statement};
use crate::expr::{AssignableTo, Expr, Null, Nullability, Predicate};
use crate::predicate::IntoPredicate;
use crate::schema::{Column, Table};
use crate::sql::{SQL, Token};
use crate::teamql_trace_stale;
use crate::types::{Compatible, DataType};

use super::check_scope;

/// A bulk statement over a single table.
pub trait Mutation {
    /// SQL name of the target table.
    fn table(&self) -> &'static str;

    fn build(&self) -> Result<SQL, BuildError>;

    /// Runs the statement and hands back the cache decision for `table`.
    fn execute<'m, E: Executor + ?Sized>(
        &self,
        executor: &E,
        cache: &'m mut IdentityMap,
    ) -> Result<Stale<'m>, QueryError> {
        let sql = self.build()?;
        let statement = Statement::from(&sql);
        let affected = executor
            .execute(&statement)
            .map_err(|source| QueryError::store(Stage::Mutation, statement.sql, source))?;
        Ok(Stale {
            cache,
            table: self.table(),
            affected,
            decided: false,
        })
    }
}

/// `UPDATE table SET ... WHERE ...`
#[derive(Debug, Clone)]
pub struct UpdateQuery<T: Table> {
    table: T,
    assignments: Vec<Assignment>,
    filter: Option<Predicate>,
}

#[derive(Debug, Clone)]
struct Assignment {
    source: &'static str,
    column: &'static str,
    value: SQL,
}

/// Starts a bulk update of `table`.
pub fn update<T: Table>(table: T) -> UpdateQuery<T> {
    UpdateQuery {
        table,
        assignments: Vec::new(),
        filter: None,
    }
}

impl<T: Table> UpdateQuery<T> {
    /// Assigns `value` to `column`. The value may reference the column
    /// itself, as in `member.age + 1`.
    ///
    /// A value that may be NULL only fits a nullable column:
    ///
    /// ```compile_fail
    /// use teamql_core::expr::{NonNull, null};
    /// use teamql_core::query::update;
    /// use teamql_core::schema::{Column, Table};
    /// use teamql_core::types::Int;
    ///
    /// #[derive(Clone, Copy)]
    /// struct Member;
    ///
    /// impl Table for Member {
    ///     const NAME: &'static str = "member";
    ///     fn alias(&self) -> &'static str { "member" }
    /// }
    ///
    /// let age: Column<Int, NonNull> = Column::new("member", "age");
    /// let _ = update(Member).set(age, null::<Int>());
    /// ```
    pub fn set<C, N, V>(mut self, column: Column<C, N>, value: V) -> Self
    where
        C: DataType + Compatible<V::SQLType>,
        N: Nullability,
        V: Expr,
        V::Nullable: AssignableTo<N>,
    {
        self.assignments.push(Assignment {
            source: column.source(),
            column: column.name(),
            value: value.into_sql(),
        });
        self
    }

    /// Assigns NULL. Only nullable columns accept it.
    ///
    /// ```compile_fail
    /// use teamql_core::expr::NonNull;
    /// use teamql_core::query::update;
    /// use teamql_core::schema::{Column, Table};
    /// use teamql_core::types::Int;
    ///
    /// #[derive(Clone, Copy)]
    /// struct Member;
    ///
    /// impl Table for Member {
    ///     const NAME: &'static str = "member";
    ///     fn alias(&self) -> &'static str { "member" }
    /// }
    ///
    /// let age: Column<Int, NonNull> = Column::new("member", "age");
    /// let _ = update(Member).set_null(age);
    /// ```
    pub fn set_null<C: DataType>(mut self, column: Column<C, Null>) -> Self {
        self.assignments.push(Assignment {
            source: column.source(),
            column: column.name(),
            value: SQL::token(Token::NULL),
        });
        self
    }

    /// Restricts the rows updated. Absent conditions update every row.
    pub fn r#where(mut self, condition: impl IntoPredicate) -> Self {
        self.filter = condition.into_predicate();
        self
    }
}

impl<T: Table> Mutation for UpdateQuery<T> {
    fn table(&self) -> &'static str {
        T::NAME
    }

    fn build(&self) -> Result<SQL, BuildError> {
        if self.assignments.is_empty() {
            return Err(BuildError::EmptyAssignments { table: T::NAME });
        }
        let scope = [self.table.alias()];
        for assignment in &self.assignments {
            if !scope.contains(&assignment.source) {
                return Err(BuildError::UnjoinedSource {
                    alias: assignment.source,
                });
            }
            check_scope(&assignment.value, &scope)?;
        }
        if let Some(filter) = &self.filter {
            check_scope(filter.as_sql(), &scope)?;
        }

        let assignments = self.assignments.iter().map(|assignment| {
            SQL::ident(assignment.column)
                .push(Token::EQ)
                .append(assignment.value.clone())
        });
        let mut sql = SQL::token(Token::UPDATE)
            .append(SQL::table(T::NAME, self.table.alias()))
            .push(Token::SET)
            .append(SQL::join(assignments, Token::COMMA));
        if let Some(filter) = &self.filter {
            sql.push_mut(Token::WHERE);
            sql.append_mut(filter.to_sql());
        }
        Ok(sql)
    }
}

/// `DELETE FROM table WHERE ...`
#[derive(Debug, Clone)]
pub struct DeleteQuery<T: Table> {
    table: T,
    filter: Option<Predicate>,
}

/// Starts a bulk delete from `table`.
pub fn delete<T: Table>(table: T) -> DeleteQuery<T> {
    DeleteQuery {
        table,
        filter: None,
    }
}

impl<T: Table> DeleteQuery<T> {
    /// Restricts the rows deleted. Absent conditions delete every row.
    pub fn r#where(mut self, condition: impl IntoPredicate) -> Self {
        self.filter = condition.into_predicate();
        self
    }
}

impl<T: Table> Mutation for DeleteQuery<T> {
    fn table(&self) -> &'static str {
        T::NAME
    }

    fn build(&self) -> Result<SQL, BuildError> {
        let mut sql = SQL::token(Token::DELETE)
            .push(Token::FROM)
            .append(SQL::table(T::NAME, self.table.alias()));
        if let Some(filter) = &self.filter {
            check_scope(filter.as_sql(), &[self.table.alias()])?;
            sql.push_mut(Token::WHERE);
            sql.append_mut(filter.to_sql());
        }
        Ok(sql)
    }
}

/// Outcome of a bulk statement, holding the identity map until the caller
/// decides what happens to the entities it cached for the table.
///
/// Dropping the token without a decision evicts them and logs a warning.
#[must_use = "cached entities of the table may be stale; call `invalidate` or `retain_cache`"]
#[derive(Debug)]
pub struct Stale<'m> {
    cache: &'m mut IdentityMap,
    table: &'static str,
    affected: u64,
    decided: bool,
}

impl Stale<'_> {
    /// Rows changed by the statement.
    #[inline]
    pub fn affected(&self) -> u64 {
        self.affected
    }

    #[inline]
    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Evicts the table's cached entities, returning how many were evicted.
    pub fn invalidate(mut self) -> usize {
        self.decided = true;
        self.cache.evict_table(self.table)
    }

    /// Keeps the cached entities even though they may no longer match the store.
    pub fn retain_cache(mut self) {
        self.decided = true;
    }
}

impl Drop for Stale<'_> {
    fn drop(&mut self) {
        if !self.decided {
            let _evicted = self.cache.evict_table(self.table);
            teamql_trace_stale!(self.table, _evicted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{NonNull, lower, lt};
    use crate::types::{BigInt, Int, Text};

    #[derive(Debug, Clone, Copy)]
    struct Member;

    impl Table for Member {
        const NAME: &'static str = "member";

        fn alias(&self) -> &'static str {
            "member"
        }
    }

    const AGE: Column<Int, NonNull> = Column::new("member", "age");
    const USERNAME: Column<Text, Null> = Column::new("member", "username");
    const TEAM_ID: Column<BigInt, Null> = Column::new("member", "team_id");

    #[test]
    fn update_renders_assignments() {
        let sql = update(Member)
            .set(AGE, AGE + 1)
            .set(USERNAME, "renamed")
            .set_null(TEAM_ID)
            .r#where(lt(AGE, 20))
            .build()
            .unwrap();
        assert_eq!(
            sql.sql(),
            r#"UPDATE "member" SET "age" = ("member"."age" + ?), "username" = ?, "team_id" = NULL WHERE "member"."age" < ?"#
        );
    }

    #[test]
    fn nullable_values_fit_nullable_columns() {
        let sql = update(Member)
            .set(USERNAME, lower(USERNAME))
            .set(TEAM_ID, crate::expr::null::<BigInt>())
            .build()
            .unwrap();
        assert_eq!(
            sql.sql(),
            r#"UPDATE "member" SET "username" = LOWER("member"."username"), "team_id" = NULL"#
        );
    }

    #[test]
    fn update_needs_an_assignment() {
        let err = update(Member).r#where(lt(AGE, 20)).build().unwrap_err();
        assert_eq!(err, BuildError::EmptyAssignments { table: "member" });
    }

    #[test]
    fn delete_renders() {
        let sql = delete(Member).r#where(lt(AGE, 20)).build().unwrap();
        assert_eq!(sql.sql(), r#"DELETE FROM "member" WHERE "member"."age" < ?"#);
    }

    #[test]
    fn foreign_columns_are_rejected() {
        let other: Column<Int, NonNull> = Column::new("team", "age");
        let err = update(Member).set(other, 1).build().unwrap_err();
        assert_eq!(err, BuildError::UnjoinedSource { alias: "team" });
    }
}
