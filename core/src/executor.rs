//! The boundary to the store that runs translated statements.

use crate::error::StoreError;
use crate::sql::SQL;
use crate::value::Value;

/// A rendered statement with its bound parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

impl From<&SQL> for Statement {
    fn from(sql: &SQL) -> Self {
        let (sql, params) = sql.build();
        Self { sql, params }
    }
}

/// Something that can run statements, usually a connection to the store.
///
/// Rows come back as plain values; decoding into projections happens in the
/// query layer.
pub trait Executor {
    /// Runs a statement that returns rows.
    fn query(&self, statement: &Statement) -> Result<Vec<Vec<Value>>, StoreError>;

    /// Runs a statement that modifies rows, returning how many it touched.
    fn execute(&self, statement: &Statement) -> Result<u64, StoreError>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn query(&self, statement: &Statement) -> Result<Vec<Vec<Value>>, StoreError> {
        (**self).query(statement)
    }

    fn execute(&self, statement: &Statement) -> Result<u64, StoreError> {
        (**self).execute(statement)
    }
}
