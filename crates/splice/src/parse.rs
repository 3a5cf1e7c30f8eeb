//! Parsing marker-annotated SQL text into statements.

use crate::codec;
use crate::error::Error;
use crate::statement::{SqlStatement, Token};

/// Parse a SQL string into a statement.
///
/// Text outside markers becomes literal tokens; each `{{…}}` marker decodes
/// back into the parameter or nested statement whose `Display` produced it.
/// The usual way to get markers into the string is ordinary interpolation:
///
/// ```
/// use splice::{param, sql};
///
/// let stmt = sql(&format!("SELECT * FROM foo WHERE id = {}", param("my_id")))?;
/// assert_eq!(stmt.to_debug_sql(), "SELECT * FROM foo WHERE id = String::my_id");
/// # Ok::<(), splice::Error>(())
/// ```
///
/// This is a single left-to-right pass over the bytes — no regex, no
/// split — because statement parsing sits on the hot path of every query
/// built from a template.
///
/// Returns [`Error::UnterminatedMarker`] when a `{{` has no matching `}}`,
/// and a decode error when a marker payload does not decode to a token.
pub fn sql(input: &str) -> Result<SqlStatement, Error> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    // `window` marks the start of the literal run being accumulated while
    // `cursor` walks the bytes. Both only ever rest on ASCII brace
    // positions or run boundaries, so slicing `input` with them is safe.
    let mut window = 0;
    let mut cursor = 0;
    while cursor < bytes.len() {
        if bytes[cursor] == b'{' && bytes.get(cursor + 1) == Some(&b'{') {
            if cursor > window {
                tokens.push(Token::Text(input[window..cursor].to_owned()));
            }
            let payload_start = cursor + 2;
            // Raw index walk to the closing braces. Payloads are base64 and
            // contain no braces, so markers cannot nest and the first `}}`
            // is always the right one.
            let mut end = payload_start;
            loop {
                if end + 1 >= bytes.len() {
                    return Err(Error::UnterminatedMarker { start: cursor });
                }
                if bytes[end] == b'}' && bytes[end + 1] == b'}' {
                    break;
                }
                end += 1;
            }
            tokens.push(codec::decode_marker(&input[payload_start..end])?);
            cursor = end + 2;
            window = cursor;
        } else {
            cursor += 1;
        }
    }
    if cursor > window {
        tokens.push(Token::Text(input[window..cursor].to_owned()));
    }
    Ok(SqlStatement::of(tokens))
}
