//! Running a query against an [`Executor`] and mapping its rows.

use crate::error::{QueryError, Result, Stage};
use crate::executor::{Executor, Statement};
use crate::projection::Projection;
use crate::row::RowReader;
use crate::sql::{SQL, Token};

use super::SelectQuery;

/// One page of results together with the unpaged total.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResults<T> {
    /// Rows matching the query, ignoring offset and limit.
    pub total: u64,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    pub results: Vec<T>,
}

impl<T> QueryResults<T> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

fn run<E: Executor + ?Sized>(
    executor: &E,
    stage: Stage,
    sql: &SQL,
) -> Result<Vec<Vec<crate::value::Value>>> {
    let statement = Statement::from(sql);
    executor
        .query(&statement)
        .map_err(|source| QueryError::store(stage, statement.sql, source))
}

impl<P: Projection, S> SelectQuery<P, S> {
    /// All rows.
    pub fn fetch<E: Executor + ?Sized>(&self, executor: &E) -> Result<Vec<P::Output>> {
        let sql = self.build()?;
        run(executor, Stage::Fetch, &sql)?
            .into_iter()
            .map(|row| self.projection.decode(&mut RowReader::new(row)))
            .collect()
    }

    /// The only row, or `None` when there is none.
    ///
    /// More than one row is [`QueryError::NonUniqueResult`].
    pub fn fetch_one<E: Executor + ?Sized>(&self, executor: &E) -> Result<Option<P::Output>> {
        let mut rows = self.fetch(executor)?;
        match rows.len() {
            0 | 1 => Ok(rows.pop()),
            n => Err(QueryError::NonUniqueResult { rows: n }),
        }
    }

    /// The first row, applying `LIMIT 1`.
    pub fn fetch_first<E: Executor + ?Sized>(&self, executor: &E) -> Result<Option<P::Output>> {
        let mut first = self.clone();
        first.limit = Some(1);
        Ok(first.fetch(executor)?.into_iter().next())
    }

    /// Number of rows the query matches, ignoring ordering and paging.
    pub fn fetch_count<E: Executor + ?Sized>(&self, executor: &E) -> Result<u64> {
        self.build()?;
        let sql = SQL::token(Token::SELECT)
            .append(SQL::func("COUNT", SQL::token(Token::STAR)))
            .push(Token::FROM)
            .append(SQL::subquery(self.render_unpaged(), self.scope()));
        let rows = run(executor, Stage::Count, &sql)?;
        let count = rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .ok_or_else(|| QueryError::Mapping("count query returned no row".into()))?;
        let count: i64 = crate::value::FromValue::from_value(count)?;
        u64::try_from(count).map_err(|_| QueryError::Mapping(format!("negative count {count}")))
    }

    /// The current page plus the total row count.
    pub fn fetch_results<E: Executor + ?Sized>(
        &self,
        executor: &E,
    ) -> Result<QueryResults<P::Output>> {
        let total = self.fetch_count(executor)?;
        let results = if total == 0 {
            Vec::new()
        } else {
            self.fetch(executor)?
        };
        Ok(QueryResults {
            total,
            offset: self.offset,
            limit: self.limit,
            results,
        })
    }
}
