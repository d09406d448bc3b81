//! Positional projections, checked by the compiler.

use core::fmt;
use core::marker::PhantomData;

use crate::error::QueryError;
use crate::row::RowReader;

use super::{ExprList, Projection, Selection};

/// Projection passing the decoded tuple to `T::from`.
///
/// See [`Projections::constructor`](super::Projections::constructor).
pub struct ConstructorProjection<T, L> {
    exprs: L,
    _target: PhantomData<fn() -> T>,
}

impl<T, L: ExprList> ConstructorProjection<T, L> {
    pub(crate) fn new(exprs: L) -> Self {
        Self {
            exprs,
            _target: PhantomData,
        }
    }
}

impl<T, L: Clone> Clone for ConstructorProjection<T, L> {
    fn clone(&self) -> Self {
        Self {
            exprs: self.exprs.clone(),
            _target: PhantomData,
        }
    }
}

impl<T, L: fmt::Debug> fmt::Debug for ConstructorProjection<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorProjection")
            .field("exprs", &self.exprs)
            .finish()
    }
}

impl<T, L> Projection for ConstructorProjection<T, L>
where
    L: ExprList,
    T: From<L::Decoded>,
{
    type Output = T;

    fn selections(&self) -> Vec<Selection> {
        self.exprs.selections()
    }

    fn decode(&self, row: &mut RowReader) -> Result<T, QueryError> {
        L::decode(row).map(T::from)
    }
}

/// A projection declared once on its target type.
///
/// The target exposes a typed associated function whose parameter bounds fix
/// the type of every argument, so call sites cannot pass the wrong columns:
///
/// ```ignore
/// impl MemberDto {
///     pub fn projection<U, A>(username: U, age: A) -> DeclaredProjection<Self, (U, A)>
///     where
///         U: Selectable<Output = Option<String>>,
///         A: Selectable<Output = i32>,
///     {
///         DeclaredProjection::new((username, age), |(username, age)| MemberDto { username, age })
///     }
/// }
/// ```
pub struct DeclaredProjection<T, L: ExprList> {
    exprs: L,
    build: fn(L::Decoded) -> T,
}

impl<T, L: ExprList> DeclaredProjection<T, L> {
    pub fn new(exprs: L, build: fn(L::Decoded) -> T) -> Self {
        Self { exprs, build }
    }
}

impl<T, L: ExprList> Clone for DeclaredProjection<T, L> {
    fn clone(&self) -> Self {
        Self {
            exprs: self.exprs.clone(),
            build: self.build,
        }
    }
}

impl<T, L: ExprList + fmt::Debug> fmt::Debug for DeclaredProjection<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclaredProjection")
            .field("exprs", &self.exprs)
            .finish_non_exhaustive()
    }
}

impl<T, L: ExprList> Projection for DeclaredProjection<T, L> {
    type Output = T;

    fn selections(&self) -> Vec<Selection> {
        self.exprs.selections()
    }

    fn decode(&self, row: &mut RowReader) -> Result<T, QueryError> {
        L::decode(row).map(self.build)
    }
}
