//! Statements as ordered token sequences.

use std::fmt;

use crate::codec;
use crate::param::SqlParameter;

/// One element of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Raw SQL text, emitted verbatim.
    Text(String),
    /// A typed parameter slot.
    Parameter(SqlParameter),
    /// A nested statement, flattened in place.
    Statement(SqlStatement),
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token::Text(text.to_owned())
    }
}

impl From<String> for Token {
    fn from(text: String) -> Self {
        Token::Text(text)
    }
}

impl From<SqlParameter> for Token {
    fn from(param: SqlParameter) -> Self {
        Token::Parameter(param)
    }
}

impl From<SqlStatement> for Token {
    fn from(stmt: SqlStatement) -> Self {
        Token::Statement(stmt)
    }
}

/// An ordered sequence of tokens representing composable SQL.
///
/// Statements are immutable once constructed; composition always builds a
/// new statement. Token order is significant and preserved through every
/// transformation, and flattening never mutates the tree, so a statement
/// can be flattened repeatedly (and shared freely across threads).
///
/// Like [`SqlParameter`], a statement's `Display` form is an opaque marker,
/// so whole statements nest through string interpolation:
///
/// ```
/// use splice::sql;
///
/// let sub = sql("SELECT id FROM bar")?;
/// let stmt = sql(&format!("SELECT * FROM foo WHERE id IN ({sub})"))?;
/// assert_eq!(
///     stmt.to_debug_sql(),
///     "SELECT * FROM foo WHERE id IN (SELECT id FROM bar)"
/// );
/// # Ok::<(), splice::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlStatement {
    tokens: Vec<Token>,
}

impl SqlStatement {
    /// Construct from an explicit token sequence. No parsing happens; the
    /// tokens are taken as-is.
    pub fn of(tokens: impl IntoIterator<Item = Token>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }

    /// A statement with no tokens.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The tokens, in order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl fmt::Display for SqlStatement {
    /// The embeddable marker form; decoded back by [`sql`](crate::sql).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::statement_marker(self))
    }
}

/// Build a statement from a mixed token list.
///
/// Anything with a `From` conversion into [`Token`] works: string slices,
/// parameters, nested statements.
///
/// ```
/// use splice::{param, statement};
///
/// let stmt = statement!["SELECT * FROM foo WHERE id = ", param(7)];
/// assert_eq!(stmt.to_driver_sql().sql, "SELECT * FROM foo WHERE id = ?");
/// ```
#[macro_export]
macro_rules! statement {
    () => {
        $crate::SqlStatement::empty()
    };
    ($($token:expr),+ $(,)?) => {
        $crate::SqlStatement::of([$($crate::Token::from($token)),+])
    };
}

/// Combine condition statements into one WHERE clause.
///
/// Empty input yields an empty statement. The first condition is prefixed
/// with `WHERE `, every later one with ` AND `; the conditions themselves
/// are nested untouched.
///
/// ```
/// use splice::{sql, where_clause};
///
/// let clause = where_clause([sql("id = 'bar'")?, sql("created_at > 0")?]);
/// assert_eq!(clause.to_debug_sql(), "WHERE id = 'bar' AND created_at > 0");
/// # Ok::<(), splice::Error>(())
/// ```
pub fn where_clause<I>(conditions: I) -> SqlStatement
where
    I: IntoIterator<Item = SqlStatement>,
{
    SqlStatement::of(conditions.into_iter().enumerate().map(|(i, condition)| {
        let prefix = if i == 0 { "WHERE " } else { " AND " };
        Token::Statement(SqlStatement::of([
            Token::from(prefix),
            Token::Statement(condition),
        ]))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::param;
    use crate::parse::sql;

    #[test]
    fn test_of_preserves_order() {
        let stmt = SqlStatement::of([
            Token::from("a"),
            Token::from(param(1)),
            Token::from("b"),
        ]);
        assert_eq!(stmt.tokens().len(), 3);
        assert!(matches!(&stmt.tokens()[0], Token::Text(t) if t == "a"));
        assert!(matches!(&stmt.tokens()[2], Token::Text(t) if t == "b"));
    }

    #[test]
    fn test_statement_macro() {
        let inner = statement!["SELECT id FROM bar"];
        let stmt = statement!["SELECT * FROM foo WHERE id IN (", inner, ")"];
        assert_eq!(
            stmt.to_debug_sql(),
            "SELECT * FROM foo WHERE id IN (SELECT id FROM bar)"
        );
        assert_eq!(statement![].tokens().len(), 0);
    }

    #[test]
    fn test_where_clause_empty() {
        assert_eq!(where_clause([]).to_debug_sql(), "");
    }

    #[test]
    fn test_where_clause_single() {
        let clause = where_clause([sql("id = 'bar'").unwrap()]);
        assert_eq!(clause.to_debug_sql(), "WHERE id = 'bar'");
    }

    #[test]
    fn test_where_clause_multiple() {
        let clause = where_clause([
            sql("id = 'bar'").unwrap(),
            sql("created_at > 0").unwrap(),
        ]);
        assert_eq!(clause.to_debug_sql(), "WHERE id = 'bar' AND created_at > 0");
    }

    #[test]
    fn test_display_roundtrip() {
        let stmt = statement!["SELECT * FROM foo WHERE id = ", param(7)];
        let reparsed = sql(&stmt.to_string()).unwrap();
        // The marker decodes to a single nested-statement token that
        // flattens identically.
        assert_eq!(reparsed.tokens().len(), 1);
        assert_eq!(reparsed.to_debug_sql(), stmt.to_debug_sql());
        assert_eq!(reparsed.to_driver_sql(), stmt.to_driver_sql());
    }
}
