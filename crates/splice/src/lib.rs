//! Composable parameterized SQL statements.
//!
//! A statement is an ordered token tree: raw text, typed parameters, and
//! nested statements. Statements and parameters render themselves as opaque
//! `{{…}}` markers, survive ordinary string interpolation, and are
//! recovered losslessly by [`sql`]. Flattening produces either driver SQL
//! with positional placeholders plus the ordered parameter list, or a
//! deterministic debug string for test assertions. Literal values always
//! travel as parameters; they are never interpolated into the SQL text.
//!
//! ```
//! use splice::{param, sql};
//!
//! let sub = sql("SELECT id FROM bar")?;
//! let stmt = sql(&format!(
//!     "SELECT * FROM foo WHERE author = {} AND id IN ({sub})",
//!     param("my_id"),
//! ))?;
//!
//! let built = stmt.to_driver_sql();
//! assert_eq!(
//!     built.sql,
//!     "SELECT * FROM foo WHERE author = ? AND id IN (SELECT id FROM bar)"
//! );
//! assert_eq!(built.params.len(), 1);
//! # Ok::<(), splice::Error>(())
//! ```
//!
//! Executing the result is the caller's business: hand `sql` and `params`
//! to any positional-binding query API (see [`DriverSql::pg_params`] for
//! the `tokio_postgres` form).

mod bind;
mod codec;
mod error;
mod param;
mod parse;
mod render;
mod statement;
mod value;

pub use bind::PgParam;
pub use error::Error;
pub use param::{SqlParameter, param, param_list, param_list_opt, param_opt};
pub use parse::sql;
pub use render::DriverSql;
pub use statement::{SqlStatement, Token, where_clause};
pub use value::{SqlScalar, SqlType, SqlValue};
