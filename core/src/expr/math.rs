//! Arithmetic on numeric expressions.
//!
//! `+` and `-` are overloaded on columns and typed expressions so that
//! assignments like `member.age + 1` read naturally.

use core::ops::{Add, Sub};

use crate::schema::Column;
use crate::sql::Token;
use crate::types::{DataType, Numeric, Promote};

use super::null::NullOr;
use super::{Expr, Nullability, SQLExpr};

type Arith<L, R> = SQLExpr<
    <<L as Expr>::SQLType as Promote<<R as Expr>::SQLType>>::Output,
    <<L as Expr>::Nullable as NullOr<<R as Expr>::Nullable>>::Output,
>;

fn arithmetic<L: Expr, R: Expr, T: DataType, N: Nullability>(
    left: L,
    operator: Token,
    right: R,
) -> SQLExpr<T, N> {
    SQLExpr::new(
        left.into_sql()
            .push(operator)
            .append(right.into_sql())
            .parens(),
    )
}

/// `(left + right)`, typed by promoting both operands.
pub fn add<L, R>(left: L, right: R) -> Arith<L, R>
where
    L: Expr,
    R: Expr,
    L::SQLType: Promote<R::SQLType>,
    R::SQLType: Numeric,
    L::Nullable: NullOr<R::Nullable>,
{
    arithmetic(left, Token::PLUS, right)
}

/// `(left - right)`, typed by promoting both operands.
pub fn sub<L, R>(left: L, right: R) -> Arith<L, R>
where
    L: Expr,
    R: Expr,
    L::SQLType: Promote<R::SQLType>,
    R::SQLType: Numeric,
    L::Nullable: NullOr<R::Nullable>,
{
    arithmetic(left, Token::MINUS, right)
}

macro_rules! impl_arith_ops {
    ($($target:ident),*) => {
        $(
            impl<T, N, R> Add<R> for $target<T, N>
            where
                T: Promote<R::SQLType>,
                N: Nullability + NullOr<R::Nullable>,
                R: Expr,
                R::SQLType: Numeric,
            {
                type Output = SQLExpr<T::Output, <N as NullOr<R::Nullable>>::Output>;

                fn add(self, rhs: R) -> Self::Output {
                    add(self, rhs)
                }
            }

            impl<T, N, R> Sub<R> for $target<T, N>
            where
                T: Promote<R::SQLType>,
                N: Nullability + NullOr<R::Nullable>,
                R: Expr,
                R::SQLType: Numeric,
            {
                type Output = SQLExpr<T::Output, <N as NullOr<R::Nullable>>::Output>;

                fn sub(self, rhs: R) -> Self::Output {
                    sub(self, rhs)
                }
            }
        )*
    };
}

impl_arith_ops!(Column, SQLExpr);
