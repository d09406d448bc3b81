//! Cursor over one result row.
//!
//! Projections read their columns left to right, so a tuple `(A, B)` reads A
//! first and B continues at the offset A stopped at. This lets one row be
//! split across several projections (an entity and its fetched association,
//! or a joined pair of entities).

use crate::error::QueryError;
use crate::value::{FromValue, Value};

#[derive(Debug, Clone)]
pub struct RowReader {
    values: Vec<Value>,
    offset: usize,
}

impl RowReader {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values, offset: 0 }
    }

    /// Index of the next column to be read.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.values.len().saturating_sub(self.offset)
    }

    /// Takes the next raw value.
    pub fn take(&mut self) -> Result<Value, QueryError> {
        let len = self.values.len();
        let offset = self.offset;
        let value = self.values.get_mut(offset).ok_or_else(|| {
            QueryError::Mapping(format!(
                "row has {len} columns, column {offset} was requested"
            ))
        })?;
        self.offset += 1;
        Ok(std::mem::take(value))
    }

    /// Decodes the next value.
    pub fn read<T: FromValue>(&mut self) -> Result<T, QueryError> {
        let column = self.offset;
        T::from_value(self.take()?)
            .map_err(|e| QueryError::Mapping(format!("column {column}: {e}")))
    }

    /// The next `width` values without consuming them.
    pub fn peek(&self, width: usize) -> &[Value] {
        let end = (self.offset + width).min(self.values.len());
        &self.values[self.offset.min(end)..end]
    }

    pub fn skip(&mut self, width: usize) {
        self.offset = (self.offset + width).min(self.values.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_left_to_right() {
        let mut row = RowReader::new(vec![
            Value::Text("member1".into()),
            Value::Integer(10),
            Value::Null,
        ]);
        assert_eq!(row.read::<String>().unwrap(), "member1");
        assert_eq!(row.peek(5), &[Value::Integer(10), Value::Null]);
        assert_eq!(row.read::<i32>().unwrap(), 10);
        assert_eq!(row.read::<Option<i64>>().unwrap(), None);
        assert!(row.read::<i32>().is_err());
    }
}
