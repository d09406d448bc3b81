//! Untyped rows keyed by the expressions that produced them.

use crate::error::{BuildError, QueryError};
use crate::expr::Selectable;
use crate::row::RowReader;
use crate::value::{FromValue, Value};

use super::{FetchJoin, Projection, Selection};

/// Projection of arbitrary expressions into a [`TupleRow`].
///
/// Built with the [`tuple!`](crate::tuple) macro.
#[derive(Debug, Clone)]
pub struct TupleProjection {
    selections: Vec<Selection>,
    keys: Vec<String>,
}

impl TupleProjection {
    pub fn new(selections: Vec<Selection>) -> Self {
        let keys = selections.iter().map(Selection::describe).collect();
        Self { selections, keys }
    }
}

impl Projection for TupleProjection {
    type Output = TupleRow;

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn decode(&self, row: &mut RowReader) -> Result<TupleRow, QueryError> {
        let values = (0..self.selections.len())
            .map(|_| row.take())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TupleRow {
            keys: self.keys.clone(),
            aliases: self.selections.iter().map(Selection::alias).collect(),
            values,
        })
    }

    fn attach_fetch(&mut self, join: &FetchJoin) -> Result<(), BuildError> {
        Err(BuildError::FetchJoinTarget { alias: join.target })
    }
}

/// One row of a raw tuple projection.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleRow {
    keys: Vec<String>,
    aliases: Vec<Option<&'static str>>,
    values: Vec<Value>,
}

impl TupleRow {
    /// Value of the column produced by `expr`, decoded to its Rust type.
    ///
    /// Returns `None` when `expr` was not part of the projection.
    pub fn get<E: Selectable>(&self, expr: &E) -> Option<Result<E::Output, QueryError>> {
        let selection = expr.selection();
        let position = match selection.alias() {
            Some(alias) => self.aliases.iter().position(|a| *a == Some(alias)),
            None => {
                let key = selection.describe();
                self.keys.iter().position(|k| *k == key)
            }
        }?;
        Some(E::Output::from_value(self.values[position].clone()))
    }

    /// Raw value by position.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Value by position, decoded to `T`.
    pub fn get_as<T: FromValue>(&self, index: usize) -> Option<Result<T, QueryError>> {
        self.values.get(index).cloned().map(T::from_value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Builds a [`TupleProjection`] from a list of selectable expressions.
///
/// ```ignore
/// let rows = select(tuple![member.username, member.age]).from(member).fetch(&session)?;
/// let name: Option<String> = rows[0].get(&member.username).transpose()?.flatten();
/// ```
#[macro_export]
macro_rules! tuple {
    ($($expr:expr),+ $(,)?) => {
        $crate::projection::TupleProjection::new(vec![
            $($crate::expr::Selectable::selection(&$expr)),+
        ])
    };
}
