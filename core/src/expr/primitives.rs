//! Rust literals as bound-parameter expressions.

use crate::sql::{SQL, Token};
use crate::types::{BigInt, Bool, DataType, Double, Int, Text};

use super::{Expr, NonNull, Null, SQLExpr};

macro_rules! literal_expr {
    ($($ty:ty => $sql_type:ty),* $(,)?) => {
        $(
            impl Expr for $ty {
                type SQLType = $sql_type;
                type Nullable = NonNull;
            }
        )*
    };
}

literal_expr! {
    i32 => Int,
    i64 => BigInt,
    f64 => Double,
    bool => Bool,
    &str => Text,
    String => Text,
}

/// A constant value used as an expression, typically as an extra select item.
///
/// ```ignore
/// select((member.username, constant("A")))
/// ```
pub fn constant<E: Expr>(value: E) -> SQLExpr<E::SQLType, E::Nullable> {
    SQLExpr::new(value.into_sql())
}

/// SQL `NULL` typed as `T`.
pub fn null<T: DataType>() -> SQLExpr<T, Null> {
    SQLExpr::new(SQL::token(Token::NULL))
}
