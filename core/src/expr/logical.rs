//! Logical connectives for boolean expressions.
//!
//! `&`, `|` and `!` are overloaded on boolean [`SQLExpr`]s as shorthands for
//! [`and`], [`or`] and [`not`].

use core::ops::{BitAnd, BitOr, Not};

use crate::sql::Token;
use crate::types::Bool;

use super::{Expr, Nullability, Predicate, SQLExpr};

/// `(left AND right)`
pub fn and<L, R>(left: L, right: R) -> Predicate
where
    L: Expr<SQLType = Bool>,
    R: Expr<SQLType = Bool>,
{
    SQLExpr::new(
        left.into_sql()
            .push(Token::AND)
            .append(right.into_sql())
            .parens(),
    )
}

/// `(left OR right)`
pub fn or<L, R>(left: L, right: R) -> Predicate
where
    L: Expr<SQLType = Bool>,
    R: Expr<SQLType = Bool>,
{
    SQLExpr::new(
        left.into_sql()
            .push(Token::OR)
            .append(right.into_sql())
            .parens(),
    )
}

/// `NOT (expr)`
pub fn not<E: Expr<SQLType = Bool>>(expr: E) -> Predicate {
    SQLExpr::new(
        crate::sql::SQL::token(Token::NOT).append(expr.into_sql().parens()),
    )
}

impl<N: Nullability, R: Expr<SQLType = Bool>> BitAnd<R> for SQLExpr<Bool, N> {
    type Output = Predicate;

    fn bitand(self, rhs: R) -> Self::Output {
        and(self, rhs)
    }
}

impl<N: Nullability, R: Expr<SQLType = Bool>> BitOr<R> for SQLExpr<Bool, N> {
    type Output = Predicate;

    fn bitor(self, rhs: R) -> Self::Output {
        or(self, rhs)
    }
}

impl<N: Nullability> Not for SQLExpr<Bool, N> {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        not(self)
    }
}
