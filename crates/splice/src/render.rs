//! Flattening statements into driver SQL or debug SQL.

use crate::param::SqlParameter;
use crate::statement::{SqlStatement, Token};

/// Placeholder style for driver SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    /// `?` — positional, as JDBC-style drivers expect.
    Question,
    /// `$1`, `$2`, … — Postgres wire style.
    Numbered,
}

/// Result of flattening a statement: the SQL string and the parameters in
/// placeholder order.
///
/// The caller hands `params` to its parameterized-query API positionally;
/// nothing here executes queries.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverSql {
    /// The SQL string with positional placeholders.
    pub sql: String,
    /// The parameters in placeholder order.
    pub params: Vec<SqlParameter>,
}

/// Builds SQL from a token tree, tracking parameter order.
struct SqlWriter {
    sql: String,
    params: Vec<SqlParameter>,
    placeholder: Placeholder,
}

impl SqlWriter {
    fn new(placeholder: Placeholder) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            placeholder,
        }
    }

    fn push_param(&mut self, param: &SqlParameter) {
        self.params.push(param.clone());
        match self.placeholder {
            Placeholder::Question => self.sql.push('?'),
            Placeholder::Numbered => {
                self.sql.push('$');
                self.sql.push_str(&self.params.len().to_string());
            }
        }
    }

    // Depth-first, left to right: nested statements splice their text in
    // place and their parameters keep global encounter order. No separators
    // are inserted at splice boundaries.
    fn statement(&mut self, stmt: &SqlStatement) {
        for token in stmt.tokens() {
            match token {
                Token::Text(text) => self.sql.push_str(text),
                Token::Parameter(param) => self.push_param(param),
                Token::Statement(nested) => self.statement(nested),
            }
        }
    }

    fn finish(self) -> DriverSql {
        DriverSql {
            sql: self.sql,
            params: self.params,
        }
    }
}

impl SqlStatement {
    /// Flatten to driver SQL with `?` placeholders.
    ///
    /// Each parameter — scalar or list — contributes exactly one
    /// placeholder and one entry in the returned parameter list, in
    /// left-to-right order across the fully expanded tree. Flattening is
    /// pure: the same statement always produces the same output.
    pub fn to_driver_sql(&self) -> DriverSql {
        self.flatten(Placeholder::Question)
    }

    /// Flatten to driver SQL with `$1..$n` placeholders, as the Postgres
    /// wire protocol expects.
    pub fn to_driver_sql_numbered(&self) -> DriverSql {
        self.flatten(Placeholder::Numbered)
    }

    fn flatten(&self, placeholder: Placeholder) -> DriverSql {
        let mut w = SqlWriter::new(placeholder);
        w.statement(self);
        w.finish()
    }

    /// Render for assertions and logs: parameters as `<Type>::<value>`,
    /// lists as `Array<Type>::[…]`. Never executable.
    pub fn to_debug_sql(&self) -> String {
        let mut out = String::new();
        self.debug_into(&mut out);
        out
    }

    fn debug_into(&self, out: &mut String) {
        for token in self.tokens() {
            match token {
                Token::Text(text) => out.push_str(text),
                Token::Parameter(param) => param.render_debug(out),
                Token::Statement(nested) => nested.debug_into(out),
            }
        }
    }
}
