//! Typed expression library.
//!
//! Every expression carries its SQL type and nullability as type parameters,
//! so comparing a number with text or assigning text to a numeric column is a
//! compile error rather than a store error.
//!
//! ```compile_fail
//! use teamql_core::expr::eq;
//! use teamql_core::schema::Column;
//! use teamql_core::types::Int;
//! use teamql_core::expr::NonNull;
//!
//! let age: Column<Int, NonNull> = Column::new("member", "age");
//! let _ = eq(age, "ten");
//! ```

mod agg;
mod case;
mod cmp;
mod logical;
mod math;
mod null;
mod primitives;
mod set;
mod string;
mod template;
mod typed;

pub use agg::*;
pub use case::*;
pub use cmp::*;
pub use logical::*;
pub use math::*;
pub use null::*;
pub use primitives::*;
pub use set::*;
pub use string::*;
pub use template::*;
pub use typed::*;

use crate::conversions::ToSQL;
use crate::projection::Selection;
use crate::types::DataType;
use crate::value::FromValue;

mod private {
    pub trait Sealed {}
}

/// Nullability marker of an expression.
pub trait Nullability: private::Sealed + Copy + Default + 'static {
    /// Whether the expression may produce NULL.
    const NULLABLE: bool;

    /// Rust type a value of this nullability decodes into, given the
    /// non-null Rust type `R`.
    type Decoded<R: FromValue>: FromValue;
}

/// The expression never produces NULL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NonNull;

/// The expression may produce NULL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Null;

impl private::Sealed for NonNull {}
impl private::Sealed for Null {}

impl Nullability for NonNull {
    const NULLABLE: bool = false;
    type Decoded<R: FromValue> = R;
}

impl Nullability for Null {
    const NULLABLE: bool = true;
    type Decoded<R: FromValue> = Option<R>;
}

/// A value of this nullability may be stored in a column of nullability `C`.
///
/// Non-null values fit any column; nullable values only fit nullable ones.
#[diagnostic::on_unimplemented(
    message = "a possibly-NULL value cannot be assigned to a NOT NULL column",
    label = "this value may be NULL"
)]
pub trait AssignableTo<C: Nullability>: Nullability {}

impl AssignableTo<NonNull> for NonNull {}
impl AssignableTo<Null> for NonNull {}
impl AssignableTo<Null> for Null {}

/// A typed SQL expression.
pub trait Expr: ToSQL {
    type SQLType: DataType;
    type Nullable: Nullability;

    /// Name a projection slot is matched against when no alias is given.
    fn natural_name(&self) -> Option<&'static str> {
        None
    }
}

/// Rust type an expression decodes into.
pub type ExprOutput<E> = <<E as Expr>::Nullable as Nullability>::Decoded<
    <<E as Expr>::SQLType as DataType>::Rust,
>;

/// Something that can occupy one column of a select list.
///
/// Every [`Expr`] is selectable; [`Aliased`] expressions are selectable but
/// cannot be used inside other expressions.
pub trait Selectable: Clone {
    type Output: FromValue;

    fn selection(&self) -> Selection;
}

impl<E: Expr + Clone> Selectable for E {
    type Output = ExprOutput<E>;

    fn selection(&self) -> Selection {
        Selection::of(self)
    }
}

/// An expression renamed for projection: `expr AS "alias"`.
#[derive(Debug, Clone, Copy)]
pub struct Aliased<E> {
    expr: E,
    alias: &'static str,
}

impl<E: Expr> Aliased<E> {
    #[inline]
    pub fn alias(&self) -> &'static str {
        self.alias
    }

    #[inline]
    pub fn expr(&self) -> &E {
        &self.expr
    }
}

impl<E: Expr + Clone> Selectable for Aliased<E> {
    type Output = ExprOutput<E>;

    fn selection(&self) -> Selection {
        Selection::of(&self.expr).with_alias(self.alias)
    }
}

/// Renames an expression in the select list.
///
/// Projection slots are matched by alias, so this is how a column whose name
/// differs from the target property is mapped.
pub fn alias<E: Expr>(expr: E, name: &'static str) -> Aliased<E> {
    Aliased { expr, alias: name }
}
