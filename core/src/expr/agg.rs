//! Aggregate functions.
//!
//! Aggregates follow SQLite's numeric semantics: `COUNT` never returns NULL,
//! while `SUM`, `AVG`, `MAX` and `MIN` are NULL over an empty group.

use crate::sql::{SQL, Token};
use crate::types::{BigInt, DataType, Double, Numeric};

use super::{Expr, NonNull, Null, SQLExpr};

/// `COUNT(expr)` - counts non-null values.
pub fn count<E: Expr>(expr: E) -> SQLExpr<BigInt, NonNull> {
    SQLExpr::new(SQL::func("COUNT", expr.into_sql()))
}

/// `COUNT(*)` - counts rows.
pub fn count_all() -> SQLExpr<BigInt, NonNull> {
    SQLExpr::new(SQL::func("COUNT", SQL::token(Token::STAR)))
}

/// `COUNT(DISTINCT expr)`
pub fn count_distinct<E: Expr>(expr: E) -> SQLExpr<BigInt, NonNull> {
    SQLExpr::new(SQL::func(
        "COUNT",
        SQL::token(Token::DISTINCT).append(expr.into_sql()),
    ))
}

/// `SUM(expr)` keeps the argument type.
pub fn sum<E>(expr: E) -> SQLExpr<E::SQLType, Null>
where
    E: Expr,
    E::SQLType: Numeric,
{
    SQLExpr::new(SQL::func("SUM", expr.into_sql()))
}

/// `AVG(expr)` is always a double.
pub fn avg<E>(expr: E) -> SQLExpr<Double, Null>
where
    E: Expr,
    E::SQLType: Numeric,
{
    SQLExpr::new(SQL::func("AVG", expr.into_sql()))
}

/// `MAX(expr)`
pub fn max<E>(expr: E) -> SQLExpr<E::SQLType, Null>
where
    E: Expr,
    E::SQLType: DataType,
{
    SQLExpr::new(SQL::func("MAX", expr.into_sql()))
}

/// `MIN(expr)`
pub fn min<E>(expr: E) -> SQLExpr<E::SQLType, Null>
where
    E: Expr,
    E::SQLType: DataType,
{
    SQLExpr::new(SQL::func("MIN", expr.into_sql()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversions::ToSQL;
    use crate::schema::Column;
    use crate::types::Int;

    #[test]
    fn renders_function_calls() {
        let age: Column<Int, NonNull> = Column::new("member", "age");
        assert_eq!(count_all().to_sql().sql(), "COUNT(*)");
        assert_eq!(avg(age).to_sql().sql(), r#"AVG("member"."age")"#);
        assert_eq!(
            count_distinct(age).to_sql().sql(),
            r#"COUNT(DISTINCT "member"."age")"#
        );
    }
}
