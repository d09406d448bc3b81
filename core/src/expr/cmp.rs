//! Type-safe comparison functions.
//!
//! - `eq`, `neq`, `gt`, `gte`, `lt`, `lte`: Require compatible types
//! - `between`: Requires expr compatible with both bounds
//! - `like`: Requires textual types on both sides

use crate::conversions::ToSQL;
use crate::sql::{SQL, Token};
use crate::types::{Compatible, Textual};

use super::{Expr, Predicate, SQLExpr};

fn binary_op<L: ToSQL, R: ToSQL>(left: L, operator: Token, right: R) -> SQL {
    left.into_sql().push(operator).append(right.into_sql())
}

/// Equality comparison (`=`).
///
/// ```ignore
/// eq(member.username, "member1");
/// eq(member.team_id, team.id);
/// ```
pub fn eq<L, R>(left: L, right: R) -> Predicate
where
    L: Expr,
    R: Expr,
    L::SQLType: Compatible<R::SQLType>,
{
    SQLExpr::new(binary_op(left, Token::EQ, right))
}

/// Inequality comparison (`<>`).
pub fn neq<L, R>(left: L, right: R) -> Predicate
where
    L: Expr,
    R: Expr,
    L::SQLType: Compatible<R::SQLType>,
{
    SQLExpr::new(binary_op(left, Token::NE, right))
}

/// Greater-than comparison (`>`).
pub fn gt<L, R>(left: L, right: R) -> Predicate
where
    L: Expr,
    R: Expr,
    L::SQLType: Compatible<R::SQLType>,
{
    SQLExpr::new(binary_op(left, Token::GT, right))
}

/// Greater-than-or-equal comparison (`>=`).
pub fn gte<L, R>(left: L, right: R) -> Predicate
where
    L: Expr,
    R: Expr,
    L::SQLType: Compatible<R::SQLType>,
{
    SQLExpr::new(binary_op(left, Token::GE, right))
}

/// Less-than comparison (`<`).
pub fn lt<L, R>(left: L, right: R) -> Predicate
where
    L: Expr,
    R: Expr,
    L::SQLType: Compatible<R::SQLType>,
{
    SQLExpr::new(binary_op(left, Token::LT, right))
}

/// Less-than-or-equal comparison (`<=`).
pub fn lte<L, R>(left: L, right: R) -> Predicate
where
    L: Expr,
    R: Expr,
    L::SQLType: Compatible<R::SQLType>,
{
    SQLExpr::new(binary_op(left, Token::LE, right))
}

/// Inclusive range check: `expr BETWEEN low AND high`.
pub fn between<E, L, H>(expr: E, low: L, high: H) -> Predicate
where
    E: Expr,
    L: Expr,
    H: Expr,
    E::SQLType: Compatible<L::SQLType> + Compatible<H::SQLType>,
{
    SQLExpr::new(
        expr.into_sql()
            .push(Token::BETWEEN)
            .append(low.into_sql())
            .push(Token::AND)
            .append(high.into_sql())
            .parens(),
    )
}

/// Pattern match: `expr LIKE pattern`.
pub fn like<E, P>(expr: E, pattern: P) -> Predicate
where
    E: Expr,
    P: Expr,
    E::SQLType: Textual,
    P::SQLType: Textual,
{
    SQLExpr::new(binary_op(expr, Token::LIKE, pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::NonNull;
    use crate::schema::Column;
    use crate::types::Int;

    const AGE: Column<Int, NonNull> = Column::new("member", "age");

    #[test]
    fn between_is_parenthesized() {
        let (sql, params) = between(AGE, 10, 30).to_sql().build();
        assert_eq!(sql, r#"("member"."age" BETWEEN ? AND ?)"#);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn compares_across_numeric_family() {
        let sql = gte(AGE, 25.5).to_sql().sql();
        assert_eq!(sql, r#""member"."age" >= ?"#);
    }
}
