//! SQL data type markers for compile-time type safety.
//!
//! Zero-sized markers represent SQL data types at the Rust type level, so the
//! compiler rejects comparisons and assignments between incompatible types.
//!
//! ```text
//! DataType (base trait)
//! ├── Numeric (Int, BigInt, Double)
//! ├── Textual (Text)
//! ├── Bool
//! └── Any (compatible with everything)
//! ```

mod coerce;

pub use coerce::*;

use crate::value::{FromValue, SqlKind, Value};

mod private {
    pub trait Sealed {}
}

/// Represents a SQL data type at the type level.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a recognized SQL data type",
    label = "use a SQL type marker (Int, BigInt, Double, Text, Bool, Any)"
)]
pub trait DataType: private::Sealed + Copy + Default + 'static {
    /// Rust type a non-null value of this SQL type decodes into.
    type Rust: FromValue;

    /// Storage class used for runtime slot checks.
    const KIND: SqlKind;
}

/// Numeric SQL types that support arithmetic operations.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a numeric SQL type",
    label = "arithmetic and SUM/AVG require Int, BigInt or Double"
)]
pub trait Numeric: DataType {}

/// String/text SQL types.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a text SQL type",
    label = "expected Text"
)]
pub trait Textual: DataType {}

/// SQL INTEGER type marker (32-bit signed integer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Int;

/// SQL BIGINT type marker (64-bit signed integer, used for identities).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BigInt;

/// SQL DOUBLE type marker (64-bit floating point).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Double;

/// SQL TEXT type marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Text;

/// SQL BOOLEAN type marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bool;

/// Dynamic/unknown SQL type marker.
///
/// Compatible with any other type, useful for raw function templates
/// when the result type is not known at compile time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Any;

impl private::Sealed for Int {}
impl private::Sealed for BigInt {}
impl private::Sealed for Double {}
impl private::Sealed for Text {}
impl private::Sealed for Bool {}
impl private::Sealed for Any {}

impl DataType for Int {
    type Rust = i32;
    const KIND: SqlKind = SqlKind::Integer;
}

impl DataType for BigInt {
    type Rust = i64;
    const KIND: SqlKind = SqlKind::Integer;
}

impl DataType for Double {
    type Rust = f64;
    const KIND: SqlKind = SqlKind::Real;
}

impl DataType for Text {
    type Rust = String;
    const KIND: SqlKind = SqlKind::Text;
}

impl DataType for Bool {
    type Rust = bool;
    const KIND: SqlKind = SqlKind::Bool;
}

impl DataType for Any {
    type Rust = Value;
    const KIND: SqlKind = SqlKind::Any;
}

impl Numeric for Int {}
impl Numeric for BigInt {}
impl Numeric for Double {}
impl Numeric for Any {}

impl Textual for Text {}
impl Textual for Any {}
