use thiserror::Error;

/// Errors from parsing marker-annotated SQL or decoding marker payloads.
///
/// All of these are fatal to the current parse or decode call: no partial
/// statement is ever returned, and none of them is worth retrying.
#[derive(Debug, Error)]
pub enum Error {
    /// Marker payload is not valid base64.
    #[error("invalid marker encoding: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Marker payload ended before the encoded token was fully read.
    #[error("marker payload truncated at byte {offset}")]
    Truncated { offset: usize },

    /// Marker payload carries bytes past the end of the encoded token.
    #[error("marker payload has {remaining} trailing bytes")]
    TrailingBytes { remaining: usize },

    /// An encoded string is not valid UTF-8.
    #[error("marker payload contains invalid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// An encoded decimal did not parse back.
    #[error("invalid decimal in marker payload: {0}")]
    InvalidDecimal(#[from] rust_decimal::Error),

    /// An encoded timestamp falls outside the representable range.
    #[error("timestamp out of range: {secs}s + {nanos}ns")]
    TimestampOutOfRange { secs: i64, nanos: u32 },

    /// A value type tag byte this library does not know.
    #[error("unknown value type tag: {tag:#04x}")]
    UnknownTypeTag { tag: u8 },

    /// A token tag byte outside the supported token shapes.
    #[error("unsupported token tag: {tag:#04x}")]
    UnsupportedToken { tag: u8 },

    /// A `{{` with no matching `}}` before end of input.
    #[error("unterminated marker starting at byte {start}")]
    UnterminatedMarker { start: usize },
}
