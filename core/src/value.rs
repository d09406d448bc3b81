//! Owned values exchanged with the store.
//!
//! Parameters are bound as [`Value`]s and rows come back as `Vec<Value>`.
//! [`FromValue`] turns a single cell into the Rust type of a projection slot.

use core::fmt;

use crate::error::QueryError;

/// A single SQL value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub const fn kind(&self) -> SqlKind {
        match self {
            Value::Null => SqlKind::Any,
            Value::Integer(_) => SqlKind::Integer,
            Value::Real(_) => SqlKind::Real,
            Value::Text(_) => SqlKind::Text,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "'{}'", v.replace('\'', "''")),
        }
    }
}

/// Storage class of a value, used to check projection slots before a query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlKind {
    Integer,
    Real,
    Text,
    Bool,
    /// Accepts and produces anything.
    Any,
}

impl SqlKind {
    /// Whether a column of kind `self` can be written into a slot of kind `slot`.
    pub const fn fits(self, slot: SqlKind) -> bool {
        matches!(
            (self, slot),
            (SqlKind::Any, _)
                | (_, SqlKind::Any)
                | (SqlKind::Integer, SqlKind::Integer | SqlKind::Real | SqlKind::Bool)
                | (SqlKind::Real, SqlKind::Real)
                | (SqlKind::Text, SqlKind::Text)
                | (SqlKind::Bool, SqlKind::Bool | SqlKind::Integer)
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SqlKind::Integer => "INTEGER",
            SqlKind::Real => "REAL",
            SqlKind::Text => "TEXT",
            SqlKind::Bool => "BOOLEAN",
            SqlKind::Any => "ANY",
        }
    }
}

impl fmt::Display for SqlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decodes one cell into a Rust value.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be decoded from a SQL value",
    label = "projection slots must be i32, i64, f64, bool, String, Value or Option of those"
)]
pub trait FromValue: Sized {
    /// Storage class this type expects.
    const KIND: SqlKind;

    /// Whether NULL decodes successfully.
    const NULLABLE: bool = false;

    fn from_value(value: Value) -> Result<Self, QueryError>;
}

fn mismatch<T>(expected: &str, value: &Value) -> Result<T, QueryError> {
    Err(QueryError::Mapping(format!(
        "expected {expected}, found {value}"
    )))
}

impl FromValue for i64 {
    const KIND: SqlKind = SqlKind::Integer;

    fn from_value(value: Value) -> Result<Self, QueryError> {
        match value {
            Value::Integer(v) => Ok(v),
            other => mismatch("INTEGER", &other),
        }
    }
}

impl FromValue for i32 {
    const KIND: SqlKind = SqlKind::Integer;

    fn from_value(value: Value) -> Result<Self, QueryError> {
        match value {
            Value::Integer(v) => i32::try_from(v)
                .map_err(|_| QueryError::Mapping(format!("{v} does not fit in i32"))),
            other => mismatch("INTEGER", &other),
        }
    }
}

impl FromValue for f64 {
    const KIND: SqlKind = SqlKind::Real;

    fn from_value(value: Value) -> Result<Self, QueryError> {
        match value {
            Value::Real(v) => Ok(v),
            Value::Integer(v) => Ok(v as f64),
            other => mismatch("REAL", &other),
        }
    }
}

impl FromValue for bool {
    const KIND: SqlKind = SqlKind::Bool;

    fn from_value(value: Value) -> Result<Self, QueryError> {
        match value {
            Value::Integer(v) => Ok(v != 0),
            other => mismatch("BOOLEAN", &other),
        }
    }
}

impl FromValue for String {
    const KIND: SqlKind = SqlKind::Text;

    fn from_value(value: Value) -> Result<Self, QueryError> {
        match value {
            Value::Text(v) => Ok(v),
            other => mismatch("TEXT", &other),
        }
    }
}

impl FromValue for Value {
    const KIND: SqlKind = SqlKind::Any;
    const NULLABLE: bool = true;

    #[inline]
    fn from_value(value: Value) -> Result<Self, QueryError> {
        Ok(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const KIND: SqlKind = T::KIND;
    const NULLABLE: bool = true;

    fn from_value(value: Value) -> Result<Self, QueryError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

// =============================================================================
// Encoding
// =============================================================================

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

// =============================================================================
// rusqlite
// =============================================================================

#[cfg(feature = "rusqlite")]
impl rusqlite::ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        use rusqlite::types::{ToSqlOutput, ValueRef};

        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(v) => ToSqlOutput::Borrowed(ValueRef::Integer(*v)),
            Value::Real(v) => ToSqlOutput::Borrowed(ValueRef::Real(*v)),
            Value::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
        })
    }
}

#[cfg(feature = "rusqlite")]
impl TryFrom<rusqlite::types::ValueRef<'_>> for Value {
    type Error = QueryError;

    fn try_from(value: rusqlite::types::ValueRef<'_>) -> Result<Self, Self::Error> {
        use rusqlite::types::ValueRef;

        match value {
            ValueRef::Null => Ok(Value::Null),
            ValueRef::Integer(v) => Ok(Value::Integer(v)),
            ValueRef::Real(v) => Ok(Value::Real(v)),
            ValueRef::Text(bytes) => String::from_utf8(bytes.to_vec())
                .map(Value::Text)
                .map_err(|e| QueryError::Mapping(e.to_string())),
            ValueRef::Blob(_) => Err(QueryError::Mapping(
                "BLOB columns are not part of the entity model".into(),
            )),
        }
    }
}
