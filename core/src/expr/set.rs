//! Membership against literal value sets.
//!
//! Subquery membership lives with the query types in
//! [`crate::query::in_subquery`] and [`crate::query::exists`].

use crate::conversions::ToSQL;
use crate::sql::{SQL, Token};
use crate::types::Compatible;

use super::{Expr, Predicate, SQLExpr};

fn membership<E, I>(expr: E, negate: bool, values: I) -> SQL
where
    E: Expr,
    I: IntoIterator,
    I::Item: ToSQL,
{
    let sql = expr.into_sql();
    let sql = if negate { sql.push(Token::NOT) } else { sql };
    sql.push(Token::IN)
        .append(SQL::join(values, Token::COMMA).parens())
}

/// `expr IN (v1, v2, ...)`
///
/// An empty list matches nothing.
pub fn in_list<E, I>(expr: E, values: I) -> Predicate
where
    E: Expr,
    I: IntoIterator,
    I::Item: Expr,
    E::SQLType: Compatible<<I::Item as Expr>::SQLType>,
{
    SQLExpr::new(membership(expr, false, values))
}

/// `expr NOT IN (v1, v2, ...)`
pub fn not_in_list<E, I>(expr: E, values: I) -> Predicate
where
    E: Expr,
    I: IntoIterator,
    I::Item: Expr,
    E::SQLType: Compatible<<I::Item as Expr>::SQLType>,
{
    SQLExpr::new(membership(expr, true, values))
}
