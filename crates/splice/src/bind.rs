//! Binding flattened parameters to `tokio_postgres`.
//!
//! Type bridging only: the flattened SQL and parameters are handed to the
//! caller's client; nothing here opens connections or runs queries.

use tokio_postgres::types::{IsNull, ToSql, Type};

use crate::param::SqlParameter;
use crate::render::DriverSql;
use crate::value::{SqlType, SqlValue};

type BoxError = Box<dyn std::error::Error + Sync + Send>;

/// Wrapper to make a [`SqlParameter`] usable as a `tokio_postgres` query
/// parameter.
///
/// Scalars bind by value kind, lists bind as Postgres arrays of the element
/// type, and nulls (scalar or list) bind as SQL NULL.
#[derive(Debug)]
pub struct PgParam<'a>(pub &'a SqlParameter);

impl ToSql for PgParam<'_> {
    fn to_sql(&self, ty: &Type, out: &mut bytes::BytesMut) -> Result<IsNull, BoxError> {
        match self.0 {
            SqlParameter::Scalar { value: None, .. }
            | SqlParameter::List { values: None, .. } => Ok(IsNull::Yes),
            SqlParameter::Scalar {
                value: Some(value), ..
            } => scalar_to_sql(value, ty, out),
            SqlParameter::List {
                ty: elem,
                values: Some(values),
            } => list_to_sql(*elem, values, ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::BOOL
                | Type::INT8
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::NUMERIC
                | Type::TIMESTAMPTZ
                | Type::BOOL_ARRAY
                | Type::INT8_ARRAY
                | Type::FLOAT8_ARRAY
                | Type::TEXT_ARRAY
                | Type::VARCHAR_ARRAY
                | Type::NUMERIC_ARRAY
                | Type::TIMESTAMPTZ_ARRAY
        )
    }

    tokio_postgres::types::to_sql_checked!();
}

fn scalar_to_sql(value: &SqlValue, ty: &Type, out: &mut bytes::BytesMut) -> Result<IsNull, BoxError> {
    match value {
        SqlValue::Bool(v) => v.to_sql(ty, out),
        SqlValue::Int(v) => v.to_sql(ty, out),
        SqlValue::Float(v) => v.to_sql(ty, out),
        SqlValue::String(v) => v.to_sql(ty, out),
        SqlValue::Decimal(v) => v.to_sql(ty, out),
        SqlValue::Timestamp(v) => v.to_sql(ty, out),
    }
}

// Arrays need a homogeneous Rust vector per element kind; the constructors
// guarantee homogeneity, so the mismatch arm is a corruption guard.
fn list_to_sql(
    elem: SqlType,
    values: &[SqlValue],
    ty: &Type,
    out: &mut bytes::BytesMut,
) -> Result<IsNull, BoxError> {
    match elem {
        SqlType::Boolean => typed(values, |v| match v {
            SqlValue::Bool(b) => Some(*b),
            _ => None,
        })?
        .to_sql(ty, out),
        SqlType::Integer => typed(values, |v| match v {
            SqlValue::Int(n) => Some(*n),
            _ => None,
        })?
        .to_sql(ty, out),
        SqlType::Float => typed(values, |v| match v {
            SqlValue::Float(n) => Some(*n),
            _ => None,
        })?
        .to_sql(ty, out),
        SqlType::String => typed(values, |v| match v {
            SqlValue::String(s) => Some(s.clone()),
            _ => None,
        })?
        .to_sql(ty, out),
        SqlType::Decimal => typed(values, |v| match v {
            SqlValue::Decimal(d) => Some(*d),
            _ => None,
        })?
        .to_sql(ty, out),
        SqlType::Timestamp => typed(values, |v| match v {
            SqlValue::Timestamp(t) => Some(*t),
            _ => None,
        })?
        .to_sql(ty, out),
    }
}

fn typed<T>(values: &[SqlValue], extract: impl Fn(&SqlValue) -> Option<T>) -> Result<Vec<T>, BoxError> {
    values
        .iter()
        .map(|v| {
            extract(v).ok_or_else(|| BoxError::from("list parameter with mixed element kinds"))
        })
        .collect()
}

impl DriverSql {
    /// Borrow the parameters in `tokio_postgres` bindable form.
    ///
    /// ```ignore
    /// let built = stmt.to_driver_sql_numbered();
    /// let rows = client.query_raw(&built.sql, built.pg_params()).await?;
    /// ```
    pub fn pg_params(&self) -> Vec<PgParam<'_>> {
        self.params.iter().map(PgParam).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{param, param_list, param_opt};

    #[test]
    fn test_scalar_binds() {
        let p = param(100);
        let mut buf = bytes::BytesMut::new();
        let is_null = PgParam(&p).to_sql(&Type::INT8, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::No));
        assert!(!buf.is_empty());
    }

    #[test]
    fn test_null_binds_as_null() {
        let p = param_opt::<i64>(None);
        let mut buf = bytes::BytesMut::new();
        let is_null = PgParam(&p).to_sql(&Type::INT8, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_list_binds_as_array() {
        let p = param_list(["1", "2", "3"]);
        let mut buf = bytes::BytesMut::new();
        let is_null = PgParam(&p).to_sql(&Type::TEXT_ARRAY, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::No));
        assert!(!buf.is_empty());
    }

    #[test]
    fn test_accepts_scalar_and_array_types() {
        assert!(<PgParam<'_> as ToSql>::accepts(&Type::INT8));
        assert!(<PgParam<'_> as ToSql>::accepts(&Type::TEXT_ARRAY));
        assert!(!<PgParam<'_> as ToSql>::accepts(&Type::BYTEA));
    }

    #[test]
    fn test_pg_params_preserves_order() {
        let built = crate::statement![
            "SELECT * FROM t WHERE a = ",
            param(1),
            " AND b = ",
            param("x"),
        ]
        .to_driver_sql_numbered();
        assert_eq!(built.pg_params().len(), 2);
    }
}
