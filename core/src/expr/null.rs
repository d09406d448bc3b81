//! NULL propagation and handling.

use crate::sql::{SQL, Token};
use crate::types::Compatible;

use super::{Expr, NonNull, Null, Nullability, Predicate, SQLExpr};

/// Combine nullability: if either input is nullable, output is nullable.
///
/// | Left | Right | Output |
/// |------|-------|--------|
/// | NonNull | NonNull | NonNull |
/// | NonNull | Null | Null |
/// | Null | NonNull | Null |
/// | Null | Null | Null |
pub trait NullOr<Rhs: Nullability>: Nullability {
    /// The resulting nullability.
    type Output: Nullability;
}

impl NullOr<NonNull> for NonNull {
    type Output = NonNull;
}
impl NullOr<Null> for NonNull {
    type Output = Null;
}
impl NullOr<NonNull> for Null {
    type Output = Null;
}
impl NullOr<Null> for Null {
    type Output = Null;
}

/// `expr IS NULL`
pub fn is_null<E: Expr>(expr: E) -> Predicate {
    SQLExpr::new(expr.into_sql().push(Token::IS).push(Token::NULL))
}

/// `expr IS NOT NULL`
pub fn is_not_null<E: Expr>(expr: E) -> Predicate {
    SQLExpr::new(
        expr.into_sql()
            .push(Token::IS)
            .push(Token::NOT)
            .push(Token::NULL),
    )
}

/// COALESCE - returns first non-null value.
///
/// The result is nullable only when the fallback is.
pub fn coalesce<E, D>(expr: E, default: D) -> SQLExpr<E::SQLType, D::Nullable>
where
    E: Expr,
    D: Expr,
    E::SQLType: Compatible<D::SQLType>,
{
    SQLExpr::new(SQL::func(
        "COALESCE",
        expr.into_sql().push(Token::COMMA).append(default.into_sql()),
    ))
}
