//! Scalar values and their declared type tags.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// The declared type of a parameter.
///
/// Captured when the parameter is constructed and carried through the marker
/// encoding unchanged, so a null parameter still knows what it would have
/// been. Rendered by name in debug SQL (`Integer::100`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Boolean,
    Integer,
    Float,
    String,
    Decimal,
    Timestamp,
}

impl SqlType {
    pub fn as_str(self) -> &'static str {
        match self {
            SqlType::Boolean => "Boolean",
            SqlType::Integer => "Integer",
            SqlType::Float => "Float",
            SqlType::String => "String",
            SqlType::Decimal => "Decimal",
            SqlType::Timestamp => "Timestamp",
        }
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runtime scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Text
    String(String),
    /// Arbitrary-precision numeric
    Decimal(Decimal),
    /// Timezone-aware timestamp, normalized to UTC
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    /// The type tag matching this value.
    pub fn sql_type(&self) -> SqlType {
        match self {
            SqlValue::Bool(_) => SqlType::Boolean,
            SqlValue::Int(_) => SqlType::Integer,
            SqlValue::Float(_) => SqlType::Float,
            SqlValue::String(_) => SqlType::String,
            SqlValue::Decimal(_) => SqlType::Decimal,
            SqlValue::Timestamp(_) => SqlType::Timestamp,
        }
    }

    /// Debug-SQL rendering of the bare value.
    ///
    /// Floats keep a fractional part (`1.0`, not `1`) and timestamps render
    /// RFC 3339, so the output is stable enough to assert against.
    pub(crate) fn render_debug(&self, out: &mut String) {
        match self {
            SqlValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            SqlValue::Int(v) => out.push_str(&v.to_string()),
            SqlValue::Float(v) => out.push_str(&format!("{v:?}")),
            SqlValue::String(v) => out.push_str(v),
            SqlValue::Decimal(v) => out.push_str(&v.to_string()),
            SqlValue::Timestamp(v) => out.push_str(&v.to_rfc3339()),
        }
    }
}

/// Rust types that can be captured as a typed parameter.
///
/// The tag is bound at compile time, which is what lets a `None` keep its
/// declared type: `param_opt::<i64>(None)` is a null `Integer`, not an
/// untyped null.
pub trait SqlScalar {
    /// Tag recorded for this Rust type.
    const SQL_TYPE: SqlType;

    fn into_sql_value(self) -> SqlValue;
}

impl SqlScalar for bool {
    const SQL_TYPE: SqlType = SqlType::Boolean;

    fn into_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl SqlScalar for i16 {
    const SQL_TYPE: SqlType = SqlType::Integer;

    fn into_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl SqlScalar for i32 {
    const SQL_TYPE: SqlType = SqlType::Integer;

    fn into_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl SqlScalar for i64 {
    const SQL_TYPE: SqlType = SqlType::Integer;

    fn into_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl SqlScalar for f32 {
    const SQL_TYPE: SqlType = SqlType::Float;

    fn into_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl SqlScalar for f64 {
    const SQL_TYPE: SqlType = SqlType::Float;

    fn into_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl SqlScalar for &str {
    const SQL_TYPE: SqlType = SqlType::String;

    fn into_sql_value(self) -> SqlValue {
        SqlValue::String(self.to_owned())
    }
}

impl SqlScalar for String {
    const SQL_TYPE: SqlType = SqlType::String;

    fn into_sql_value(self) -> SqlValue {
        SqlValue::String(self)
    }
}

impl SqlScalar for Decimal {
    const SQL_TYPE: SqlType = SqlType::Decimal;

    fn into_sql_value(self) -> SqlValue {
        SqlValue::Decimal(self)
    }
}

impl SqlScalar for DateTime<Utc> {
    const SQL_TYPE: SqlType = SqlType::Timestamp;

    fn into_sql_value(self) -> SqlValue {
        SqlValue::Timestamp(self)
    }
}

// Convenient From impls
impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i16> for SqlValue {
    fn from(v: i16) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::Float(f64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::String(v.to_owned())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::String(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}
