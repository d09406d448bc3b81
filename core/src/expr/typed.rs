//! SQLExpr - A typed SQL expression wrapper.

use core::marker::PhantomData;

use crate::conversions::ToSQL;
use crate::sql::SQL;
use crate::types::{Bool, DataType};

use super::{Expr, NonNull, Nullability};

/// A SQL expression that carries type information.
///
/// - `T`: The SQL data type marker (Int, Text, etc.)
/// - `N`: The nullability marker (NonNull or Null)
#[derive(Debug, Clone)]
pub struct SQLExpr<T: DataType, N: Nullability = NonNull> {
    sql: SQL,
    _ty: PhantomData<(T, N)>,
}

impl<T: DataType, N: Nullability> SQLExpr<T, N> {
    /// Create a new typed expression from raw SQL.
    #[inline]
    pub fn new(sql: SQL) -> Self {
        Self {
            sql,
            _ty: PhantomData,
        }
    }

    /// Get a reference to the inner SQL.
    #[inline]
    pub fn as_sql(&self) -> &SQL {
        &self.sql
    }

    /// Change the nullability marker (internal use only).
    #[inline]
    pub(crate) fn with_nullability<N2: Nullability>(self) -> SQLExpr<T, N2> {
        SQLExpr::new(self.sql)
    }
}

impl<T: DataType, N: Nullability> ToSQL for SQLExpr<T, N> {
    fn to_sql(&self) -> SQL {
        self.sql.clone()
    }

    fn into_sql(self) -> SQL {
        self.sql
    }
}

impl<T: DataType, N: Nullability> From<SQLExpr<T, N>> for SQL {
    fn from(expr: SQLExpr<T, N>) -> Self {
        expr.sql
    }
}

impl<T: DataType, N: Nullability> Expr for SQLExpr<T, N> {
    type SQLType = T;
    type Nullable = N;
}

/// A boolean condition.
pub type Predicate = SQLExpr<Bool, NonNull>;
