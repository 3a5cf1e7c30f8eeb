//! Typed SQL parameters.

use std::fmt;

use crate::codec;
use crate::value::{SqlScalar, SqlType, SqlValue};

/// A typed parameter slot.
///
/// A scalar carries one value (or null); a list carries an ordered sequence
/// of values (or null) sharing one declared element type. Either shape
/// flattens to a single placeholder and contributes a single entry to the
/// ordered parameter list.
///
/// A parameter's `Display` form is the opaque `{{…}}` marker, so it can be
/// spliced into a `format!` template and recovered intact by [`sql`].
///
/// [`sql`]: crate::sql
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParameter {
    /// One value (or null) plus its declared type.
    Scalar {
        ty: SqlType,
        value: Option<SqlValue>,
    },
    /// An ordered collection of values (or null) sharing one element type.
    List {
        ty: SqlType,
        values: Option<Vec<SqlValue>>,
    },
}

/// Capture a value as a scalar parameter.
pub fn param<T: SqlScalar>(value: T) -> SqlParameter {
    SqlParameter::Scalar {
        ty: T::SQL_TYPE,
        value: Some(value.into_sql_value()),
    }
}

/// Capture an optional value as a scalar parameter.
///
/// `None` keeps the declared type: `param_opt::<i64>(None)` is a null
/// `Integer`.
pub fn param_opt<T: SqlScalar>(value: Option<T>) -> SqlParameter {
    SqlParameter::Scalar {
        ty: T::SQL_TYPE,
        value: value.map(SqlScalar::into_sql_value),
    }
}

/// Capture a collection as a list parameter.
pub fn param_list<T, I>(values: I) -> SqlParameter
where
    T: SqlScalar,
    I: IntoIterator<Item = T>,
{
    SqlParameter::List {
        ty: T::SQL_TYPE,
        values: Some(
            values
                .into_iter()
                .map(SqlScalar::into_sql_value)
                .collect(),
        ),
    }
}

/// Capture an optional collection as a list parameter.
pub fn param_list_opt<T, I>(values: Option<I>) -> SqlParameter
where
    T: SqlScalar,
    I: IntoIterator<Item = T>,
{
    match values {
        Some(values) => param_list(values),
        None => SqlParameter::List {
            ty: T::SQL_TYPE,
            values: None,
        },
    }
}

impl SqlParameter {
    /// The declared value type (element type for lists).
    pub fn ty(&self) -> SqlType {
        match self {
            SqlParameter::Scalar { ty, .. } | SqlParameter::List { ty, .. } => *ty,
        }
    }

    /// True for a null scalar or a null list.
    pub fn is_null(&self) -> bool {
        match self {
            SqlParameter::Scalar { value, .. } => value.is_none(),
            SqlParameter::List { values, .. } => values.is_none(),
        }
    }

    /// Debug-SQL rendering: `Integer::100`, `Array<String>::[1, 2, 3]`,
    /// nulls as `String::null` / `Array<String>::null`.
    pub(crate) fn render_debug(&self, out: &mut String) {
        match self {
            SqlParameter::Scalar { ty, value } => {
                out.push_str(ty.as_str());
                out.push_str("::");
                match value {
                    Some(value) => value.render_debug(out),
                    None => out.push_str("null"),
                }
            }
            SqlParameter::List { ty, values } => {
                out.push_str("Array<");
                out.push_str(ty.as_str());
                out.push_str(">::");
                match values {
                    Some(values) => {
                        out.push('[');
                        for (i, value) in values.iter().enumerate() {
                            if i > 0 {
                                out.push_str(", ");
                            }
                            value.render_debug(out);
                        }
                        out.push(']');
                    }
                    None => out.push_str("null"),
                }
            }
        }
    }
}

impl fmt::Display for SqlParameter {
    /// The embeddable marker form. String interpolation goes through here,
    /// so no type information is lost on the way into a host template.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::parameter_marker(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_param_captures_type() {
        assert_eq!(param("my_id").ty(), SqlType::String);
        assert_eq!(param(100).ty(), SqlType::Integer);
        assert_eq!(param(Decimal::new(10, 1)).ty(), SqlType::Decimal);
    }

    #[test]
    fn test_null_keeps_declared_type() {
        let p = param_opt::<i64>(None);
        assert!(p.is_null());
        assert_eq!(p.ty(), SqlType::Integer);

        let p = param_list_opt::<&str, Vec<&str>>(None);
        assert!(p.is_null());
        assert_eq!(p.ty(), SqlType::String);
    }

    #[test]
    fn test_debug_rendering() {
        let mut out = String::new();
        param(100).render_debug(&mut out);
        assert_eq!(out, "Integer::100");

        let mut out = String::new();
        param_list(["1", "2", "3"]).render_debug(&mut out);
        assert_eq!(out, "Array<String>::[1, 2, 3]");

        let mut out = String::new();
        param_opt::<bool>(None).render_debug(&mut out);
        assert_eq!(out, "Boolean::null");
    }

    #[test]
    fn test_display_is_a_marker() {
        let rendered = param(42).to_string();
        assert!(rendered.starts_with("{{"));
        assert!(rendered.ends_with("}}"));
        // Payload alphabet excludes the bracket characters.
        assert!(!rendered[2..rendered.len() - 2].contains(['{', '}']));
    }
}
