//! Query descriptors.
//!
//! A [`SelectQuery`] is built progressively (select, from, join, where,
//! group/having, order, offset/limit) and only turned into SQL by
//! [`SelectQuery::build`], which checks that every clause references sources
//! that are actually part of the query. Execution lives in [`fetch`], joins
//! in [`join`], subqueries in [`subquery`] and bulk statements in [`mutation`].

pub mod fetch;
pub mod join;
pub mod mutation;
pub mod order;
pub mod subquery;

use core::marker::PhantomData;

pub use fetch::QueryResults;
pub use join::JoinKind;
pub use mutation::{DeleteQuery, Mutation, Stale, UpdateQuery, delete, update};
pub use order::{IntoOrderSpecifiers, NullsOrder, OrderSpecifier, asc, desc};
pub use subquery::{Derived, exists, in_subquery, not_exists};

use crate::conversions::ToSQL;
use crate::error::BuildError;
use crate::expr::Predicate;
use crate::predicate::IntoPredicate;
use crate::projection::{ExprList, Projection, Selection};
use crate::schema::{Source, Table};
use crate::sql::{SQL, Token};
use crate::teamql_trace_overwrite;

/// Typestate: no source has been given yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsourced;

/// Typestate: the query selects from a source and can be joined.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sourced;

/// The source after `FROM`.
#[derive(Debug, Clone)]
pub(crate) struct SourceClause {
    pub(crate) sql: SQL,
    pub(crate) alias: &'static str,
}

/// A SELECT under construction.
#[derive(Debug)]
pub struct SelectQuery<P, S = Sourced> {
    pub(crate) projection: P,
    pub(crate) distinct: bool,
    pub(crate) from: Option<SourceClause>,
    pub(crate) joins: Vec<join::JoinClause>,
    pub(crate) filter: Option<Predicate>,
    pub(crate) group_by: Vec<SQL>,
    pub(crate) having: Option<Predicate>,
    pub(crate) order_by: Vec<OrderSpecifier>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    _state: PhantomData<S>,
}

impl<P: Clone, S> Clone for SelectQuery<P, S> {
    fn clone(&self) -> Self {
        Self {
            projection: self.projection.clone(),
            distinct: self.distinct,
            from: self.from.clone(),
            joins: self.joins.clone(),
            filter: self.filter.clone(),
            group_by: self.group_by.clone(),
            having: self.having.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            offset: self.offset,
            _state: PhantomData,
        }
    }
}

/// Starts a query selecting `projection`.
pub fn select<P: Projection>(projection: P) -> SelectQuery<P, Unsourced> {
    SelectQuery::new(projection, false)
}

/// Starts a `SELECT DISTINCT` query.
pub fn select_distinct<P: Projection>(projection: P) -> SelectQuery<P, Unsourced> {
    SelectQuery::new(projection, true)
}

/// Selects whole rows of `table` from `table`.
pub fn select_from<T: Table + Projection>(table: T) -> SelectQuery<T, Sourced> {
    select(table).from(table)
}

impl<P: Projection> SelectQuery<P, Unsourced> {
    fn new(projection: P, distinct: bool) -> Self {
        Self {
            projection,
            distinct,
            from: None,
            joins: Vec::new(),
            filter: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
            _state: PhantomData,
        }
    }
}

impl<P: Projection, S> SelectQuery<P, S> {
    /// Sets the source. A second call replaces the first.
    pub fn from<Src: Source>(self, source: Src) -> SelectQuery<P, Sourced> {
        if self.from.is_some() {
            teamql_trace_overwrite!("from");
        }
        SelectQuery {
            projection: self.projection,
            distinct: self.distinct,
            from: Some(SourceClause {
                sql: source.source_sql(),
                alias: source.source_alias(),
            }),
            joins: self.joins,
            filter: self.filter,
            group_by: self.group_by,
            having: self.having,
            order_by: self.order_by,
            limit: self.limit,
            offset: self.offset,
            _state: PhantomData,
        }
    }

    /// Sets the filter. Absent conditions leave the query unfiltered.
    ///
    /// Single slot: a second call replaces the first.
    pub fn r#where(mut self, condition: impl IntoPredicate) -> Self {
        if self.filter.is_some() {
            teamql_trace_overwrite!("where");
        }
        self.filter = condition.into_predicate();
        self
    }

    /// Sets the grouping keys. Single slot.
    pub fn group_by<L: ExprList>(mut self, keys: L) -> Self {
        if !self.group_by.is_empty() {
            teamql_trace_overwrite!("group_by");
        }
        self.group_by = keys
            .selections()
            .into_iter()
            .map(Selection::into_sql)
            .collect();
        self
    }

    /// Sets the post-grouping filter. Single slot.
    pub fn having(mut self, condition: impl IntoPredicate) -> Self {
        if self.having.is_some() {
            teamql_trace_overwrite!("having");
        }
        self.having = condition.into_predicate();
        self
    }

    /// Appends sort keys after any already given.
    pub fn order_by(mut self, keys: impl IntoOrderSpecifiers) -> Self {
        self.order_by.extend(keys.into_specifiers());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[inline]
    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// Aliases declared by this query, the source first.
    pub fn scope(&self) -> Vec<&'static str> {
        self.from
            .iter()
            .map(|from| from.alias)
            .chain(self.joins.iter().map(|join| join.alias))
            .collect()
    }

    /// Checks every clause and renders the statement.
    pub fn build(&self) -> Result<SQL, BuildError> {
        let scope = self.scope();
        let left_joined: Vec<&'static str> = self
            .joins
            .iter()
            .filter(|join| join.kind == JoinKind::Left)
            .map(|join| join.alias)
            .collect();
        for selection in self.projection.selections() {
            check_scope(selection.sql(), &scope)?;
            check_left_joined(&selection, &left_joined)?;
        }
        for join in &self.joins {
            if let Some(on) = &join.on {
                check_scope(on, &scope)?;
            }
        }
        let clauses = self
            .filter
            .iter()
            .chain(self.having.iter())
            .map(Predicate::as_sql)
            .chain(self.group_by.iter())
            .chain(self.order_by.iter().map(OrderSpecifier::expr));
        for clause in clauses {
            check_scope(clause, &scope)?;
        }

        Ok(self.render())
    }

    /// Renders without scope checks. Used for nested queries whose outer
    /// references are checked by the enclosing query.
    pub(crate) fn render(&self) -> SQL {
        let mut sql = self.render_unpaged();
        if !self.order_by.is_empty() {
            sql.push_mut(Token::ORDER);
            sql.push_mut(Token::BY);
            sql.append_mut(SQL::join(&self.order_by, Token::COMMA));
        }
        match (self.limit, self.offset) {
            (Some(limit), offset) => {
                sql.push_mut(Token::LIMIT);
                sql.append_mut(SQL::number(clamp(limit)));
                if let Some(offset) = offset {
                    sql.push_mut(Token::OFFSET);
                    sql.append_mut(SQL::number(clamp(offset)));
                }
            }
            (None, Some(offset)) => {
                sql.push_mut(Token::LIMIT);
                sql.append_mut(SQL::number(-1));
                sql.push_mut(Token::OFFSET);
                sql.append_mut(SQL::number(clamp(offset)));
            }
            (None, None) => {}
        }
        sql
    }

    /// Everything up to HAVING; the part a count query wraps.
    pub(crate) fn render_unpaged(&self) -> SQL {
        let mut sql = SQL::token(Token::SELECT);
        if self.distinct {
            sql.push_mut(Token::DISTINCT);
        }
        sql.append_mut(SQL::join(
            self.projection.selections().iter().map(Selection::render),
            Token::COMMA,
        ));
        if let Some(from) = &self.from {
            sql.push_mut(Token::FROM);
            sql.append_mut(from.sql.clone());
        }
        for join in &self.joins {
            sql.append_mut(join.to_sql());
        }
        if let Some(filter) = &self.filter {
            sql.push_mut(Token::WHERE);
            sql.append_mut(filter.to_sql());
        }
        if !self.group_by.is_empty() {
            sql.push_mut(Token::GROUP);
            sql.push_mut(Token::BY);
            sql.append_mut(SQL::join(&self.group_by, Token::COMMA));
        }
        if let Some(having) = &self.having {
            sql.push_mut(Token::HAVING);
            sql.append_mut(having.to_sql());
        }
        sql
    }
}

fn clamp(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// A selection reading the outer side of a left join sees NULL for unmatched
/// rows, so it must decode NULL unless the expression absorbs it.
fn check_left_joined(selection: &Selection, left_joined: &[&'static str]) -> Result<(), BuildError> {
    if selection.is_nullable() || selection.sql().absorbs_null() {
        return Ok(());
    }
    match selection
        .sql()
        .column_sources()
        .find(|source| left_joined.contains(source))
    {
        Some(alias) => Err(BuildError::LeftJoinedSelection {
            alias,
            expression: selection.describe(),
        }),
        None => Ok(()),
    }
}

/// Checks that `sql` only references aliases in `scope`, and that nested
/// queries declare aliases distinct from every enclosing one.
pub(crate) fn check_scope(sql: &SQL, scope: &[&'static str]) -> Result<(), BuildError> {
    if let Some(alias) = sql.column_sources().find(|source| !scope.contains(source)) {
        return Err(BuildError::UnjoinedSource { alias });
    }
    for (nested, aliases) in sql.subqueries() {
        if let Some(alias) = aliases.iter().find(|alias| scope.contains(*alias)) {
            return Err(BuildError::DuplicateAlias { alias: *alias });
        }
        let inner: Vec<_> = scope.iter().chain(aliases).copied().collect();
        check_scope(nested, &inner)?;
    }
    Ok(())
}
