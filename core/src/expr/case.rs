//! Type-safe CASE/WHEN expressions.
//!
//! Branches are evaluated top to bottom and the first match wins. The result
//! type is fixed by the first branch; nullability accumulates over every
//! branch and becomes `Null` when no `otherwise` is given.
//!
//! ```ignore
//! // Searched CASE
//! case()
//!     .when(between(member.age, 0, 20), "0~20")
//!     .when(between(member.age, 21, 30), "21~30")
//!     .otherwise("other")
//!
//! // Simple CASE
//! case_of(member.age)
//!     .when(10, "ten")
//!     .when(20, "twenty")
//!     .otherwise("other")
//! ```

use core::marker::PhantomData;

use crate::sql::{SQL, Token};
use crate::types::{Bool, Compatible, DataType};

use super::null::NullOr;
use super::{Expr, Null, Nullability, SQLExpr};

// =============================================================================
// Searched CASE
// =============================================================================

/// Start building a searched CASE expression.
pub fn case() -> CaseInit {
    CaseInit {
        sql: SQL::token(Token::CASE),
    }
}

/// Builder state before the first WHEN branch.
#[derive(Debug, Clone)]
pub struct CaseInit {
    sql: SQL,
}

impl CaseInit {
    /// Add the first WHEN branch. This establishes the result type.
    pub fn when<C, R>(self, condition: C, result: R) -> CaseBuilder<R::SQLType, R::Nullable>
    where
        C: Expr<SQLType = Bool>,
        R: Expr,
    {
        CaseBuilder::new(branch(self.sql, condition, result))
    }
}

/// Builder state after at least one WHEN branch has been added.
#[derive(Debug, Clone)]
pub struct CaseBuilder<T: DataType, N: Nullability> {
    sql: SQL,
    _marker: PhantomData<(T, N)>,
}

impl<T: DataType, N: Nullability> CaseBuilder<T, N> {
    fn new(sql: SQL) -> Self {
        Self {
            sql,
            _marker: PhantomData,
        }
    }

    /// Add another WHEN branch.
    pub fn when<C, R>(
        self,
        condition: C,
        result: R,
    ) -> CaseBuilder<T, <N as NullOr<R::Nullable>>::Output>
    where
        C: Expr<SQLType = Bool>,
        R: Expr,
        T: Compatible<R::SQLType>,
        N: NullOr<R::Nullable>,
    {
        CaseBuilder::new(branch(self.sql, condition, result))
    }

    /// Finish with a fallback value: `... ELSE fallback END`.
    pub fn otherwise<D>(self, fallback: D) -> SQLExpr<T, <N as NullOr<D::Nullable>>::Output>
    where
        D: Expr,
        T: Compatible<D::SQLType>,
        N: NullOr<D::Nullable>,
    {
        SQLExpr::new(finish(self.sql, Some(fallback.into_sql())))
    }

    /// Finish without a fallback; unmatched rows yield NULL.
    pub fn end(self) -> SQLExpr<T, Null> {
        SQLExpr::new(finish(self.sql, None))
    }
}

// =============================================================================
// Simple CASE
// =============================================================================

/// Start building a simple CASE over `operand`: `CASE operand WHEN v THEN r ...`.
pub fn case_of<O: Expr>(operand: O) -> SimpleCaseInit<O::SQLType> {
    SimpleCaseInit {
        sql: SQL::token(Token::CASE).append(operand.into_sql()),
        _marker: PhantomData,
    }
}

/// Simple CASE before the first WHEN branch. `O` is the operand type.
#[derive(Debug, Clone)]
pub struct SimpleCaseInit<O: DataType> {
    sql: SQL,
    _marker: PhantomData<O>,
}

impl<O: DataType> SimpleCaseInit<O> {
    /// Add the first WHEN branch. The value must be comparable with the operand.
    pub fn when<V, R>(self, value: V, result: R) -> SimpleCaseBuilder<O, R::SQLType, R::Nullable>
    where
        V: Expr,
        R: Expr,
        O: Compatible<V::SQLType>,
    {
        SimpleCaseBuilder::new(branch(self.sql, value, result))
    }
}

/// Simple CASE after at least one WHEN branch.
#[derive(Debug, Clone)]
pub struct SimpleCaseBuilder<O: DataType, T: DataType, N: Nullability> {
    sql: SQL,
    _marker: PhantomData<(O, T, N)>,
}

impl<O: DataType, T: DataType, N: Nullability> SimpleCaseBuilder<O, T, N> {
    fn new(sql: SQL) -> Self {
        Self {
            sql,
            _marker: PhantomData,
        }
    }

    pub fn when<V, R>(
        self,
        value: V,
        result: R,
    ) -> SimpleCaseBuilder<O, T, <N as NullOr<R::Nullable>>::Output>
    where
        V: Expr,
        R: Expr,
        O: Compatible<V::SQLType>,
        T: Compatible<R::SQLType>,
        N: NullOr<R::Nullable>,
    {
        SimpleCaseBuilder::new(branch(self.sql, value, result))
    }

    pub fn otherwise<D>(self, fallback: D) -> SQLExpr<T, <N as NullOr<D::Nullable>>::Output>
    where
        D: Expr,
        T: Compatible<D::SQLType>,
        N: NullOr<D::Nullable>,
    {
        SQLExpr::new(finish(self.sql, Some(fallback.into_sql())))
    }

    pub fn end(self) -> SQLExpr<T, Null> {
        SQLExpr::new(finish(self.sql, None))
    }
}

fn branch<C: Expr, R: Expr>(sql: SQL, condition: C, result: R) -> SQL {
    sql.push(Token::WHEN)
        .append(condition.into_sql())
        .push(Token::THEN)
        .append(result.into_sql())
}

fn finish(sql: SQL, fallback: Option<SQL>) -> SQL {
    let sql = match fallback {
        Some(fallback) => sql.push(Token::ELSE).append(fallback),
        None => sql,
    };
    sql.push(Token::END)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversions::ToSQL;
    use crate::expr::{NonNull, between};
    use crate::schema::Column;
    use crate::types::Int;

    const AGE: Column<Int, NonNull> = Column::new("member", "age");

    #[test]
    fn searched_case_renders_branches_in_order() {
        let expr = case()
            .when(between(AGE, 0, 20), "0~20")
            .when(between(AGE, 21, 30), "21~30")
            .otherwise("other");
        let (sql, params) = expr.to_sql().build();
        assert_eq!(
            sql,
            r#"CASE WHEN ("member"."age" BETWEEN ? AND ?) THEN ? WHEN ("member"."age" BETWEEN ? AND ?) THEN ? ELSE ? END"#
        );
        assert_eq!(params.len(), 7);
    }

    #[test]
    fn simple_case_without_fallback_ends() {
        let expr = case_of(AGE).when(10, "ten").end();
        assert_eq!(
            expr.to_sql().sql(),
            r#"CASE "member"."age" WHEN ? THEN ? END"#
        );
    }
}
