//! String expressions.

use crate::sql::{SQL, Token};
use crate::types::{Text, Textual};

use super::null::NullOr;
use super::{Expr, SQLExpr};

/// `left || right`
///
/// Concatenation with a NULL operand is NULL, so the result is nullable when
/// either side is.
pub fn concat<L, R>(left: L, right: R) -> SQLExpr<Text, <L::Nullable as NullOr<R::Nullable>>::Output>
where
    L: Expr,
    R: Expr,
    L::SQLType: Textual,
    R::SQLType: Textual,
    L::Nullable: NullOr<R::Nullable>,
{
    SQLExpr::new(
        left.into_sql()
            .push(Token::CONCAT)
            .append(right.into_sql()),
    )
}

/// `CAST(expr AS TEXT)`, the textual form of any value.
pub fn string_value<E: Expr>(expr: E) -> SQLExpr<Text, E::Nullable> {
    SQLExpr::new(SQL::func(
        "CAST",
        expr.into_sql().push(Token::AS).append(SQL::raw("TEXT")),
    ))
}

/// `LOWER(expr)`
pub fn lower<E>(expr: E) -> SQLExpr<Text, E::Nullable>
where
    E: Expr,
    E::SQLType: Textual,
{
    SQLExpr::new(SQL::func("LOWER", expr.into_sql()))
}

/// `UPPER(expr)`
pub fn upper<E>(expr: E) -> SQLExpr<Text, E::Nullable>
where
    E: Expr,
    E::SQLType: Textual,
{
    SQLExpr::new(SQL::func("UPPER", expr.into_sql()))
}
