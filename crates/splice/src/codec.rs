//! Marker encoding: tokens to and from their embeddable text form.
//!
//! A marker is `{{` + base64 payload + `}}`. The payload is a hand-written
//! binary encoding of one token: a tag byte per token shape, a tag byte per
//! scalar kind, a presence byte for nullable slots, little-endian integers,
//! and length-prefixed UTF-8. The base64 alphabet contains no brace
//! characters, so a payload can never contain the sequences that delimit
//! markers and markers can never nest inside one another.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::DateTime;

use crate::error::Error;
use crate::param::SqlParameter;
use crate::statement::{SqlStatement, Token};
use crate::value::{SqlType, SqlValue};

pub(crate) const MARKER_OPEN: &str = "{{";
pub(crate) const MARKER_CLOSE: &str = "}}";

// Token shape tags.
const TAG_TEXT: u8 = 0;
const TAG_SCALAR: u8 = 1;
const TAG_LIST: u8 = 2;
const TAG_STATEMENT: u8 = 3;

// Scalar kind tags.
const KIND_BOOLEAN: u8 = 0;
const KIND_INTEGER: u8 = 1;
const KIND_FLOAT: u8 = 2;
const KIND_STRING: u8 = 3;
const KIND_DECIMAL: u8 = 4;
const KIND_TIMESTAMP: u8 = 5;

/// Marker form of a parameter.
pub(crate) fn parameter_marker(param: &SqlParameter) -> String {
    let mut buf = Vec::new();
    encode_parameter(param, &mut buf);
    wrap(&buf)
}

/// Marker form of a statement.
pub(crate) fn statement_marker(stmt: &SqlStatement) -> String {
    let mut buf = Vec::new();
    encode_statement(stmt, &mut buf);
    wrap(&buf)
}

fn wrap(payload: &[u8]) -> String {
    format!("{MARKER_OPEN}{}{MARKER_CLOSE}", STANDARD.encode(payload))
}

/// Decode the text between `{{` and `}}` back into the token it encodes.
pub(crate) fn decode_marker(payload: &str) -> Result<Token, Error> {
    let bytes = STANDARD.decode(payload)?;
    let mut r = Reader::new(&bytes);
    let token = decode_token(&mut r)?;
    if r.remaining() != 0 {
        return Err(Error::TrailingBytes {
            remaining: r.remaining(),
        });
    }
    Ok(token)
}

fn encode_token(token: &Token, buf: &mut Vec<u8>) {
    match token {
        Token::Text(text) => {
            buf.push(TAG_TEXT);
            put_str(buf, text);
        }
        Token::Parameter(param) => encode_parameter(param, buf),
        Token::Statement(stmt) => encode_statement(stmt, buf),
    }
}

fn encode_parameter(param: &SqlParameter, buf: &mut Vec<u8>) {
    match param {
        SqlParameter::Scalar { ty, value } => {
            buf.push(TAG_SCALAR);
            buf.push(kind_tag(*ty));
            match value {
                Some(value) => {
                    buf.push(1);
                    encode_value(value, buf);
                }
                None => buf.push(0),
            }
        }
        SqlParameter::List { ty, values } => {
            buf.push(TAG_LIST);
            buf.push(kind_tag(*ty));
            match values {
                Some(values) => {
                    buf.push(1);
                    put_len(buf, values.len());
                    for value in values {
                        encode_value(value, buf);
                    }
                }
                None => buf.push(0),
            }
        }
    }
}

fn encode_statement(stmt: &SqlStatement, buf: &mut Vec<u8>) {
    buf.push(TAG_STATEMENT);
    put_len(buf, stmt.tokens().len());
    for token in stmt.tokens() {
        encode_token(token, buf);
    }
}

// The kind tag is written once per parameter; list elements share it.
fn encode_value(value: &SqlValue, buf: &mut Vec<u8>) {
    match value {
        SqlValue::Bool(v) => buf.push(u8::from(*v)),
        SqlValue::Int(v) => buf.extend_from_slice(&v.to_le_bytes()),
        SqlValue::Float(v) => buf.extend_from_slice(&v.to_bits().to_le_bytes()),
        SqlValue::String(v) => put_str(buf, v),
        // Canonical string form round-trips scale exactly.
        SqlValue::Decimal(v) => put_str(buf, &v.to_string()),
        // Seconds + subsecond nanos is lossless for the full chrono range.
        SqlValue::Timestamp(v) => {
            buf.extend_from_slice(&v.timestamp().to_le_bytes());
            buf.extend_from_slice(&v.timestamp_subsec_nanos().to_le_bytes());
        }
    }
}

fn decode_token(r: &mut Reader<'_>) -> Result<Token, Error> {
    let tag = r.u8()?;
    match tag {
        TAG_TEXT => Ok(Token::Text(r.string()?)),
        TAG_SCALAR => {
            let ty = kind_from_tag(r.u8()?)?;
            let value = if r.u8()? != 0 {
                Some(decode_value(ty, r)?)
            } else {
                None
            };
            Ok(Token::Parameter(SqlParameter::Scalar { ty, value }))
        }
        TAG_LIST => {
            let ty = kind_from_tag(r.u8()?)?;
            let values = if r.u8()? != 0 {
                let count = r.len()?;
                // Every element takes at least one byte; capping the
                // preallocation at what the payload could actually hold
                // keeps a corrupt count from allocating gigabytes.
                let mut values = Vec::with_capacity(count.min(r.remaining()));
                for _ in 0..count {
                    values.push(decode_value(ty, r)?);
                }
                Some(values)
            } else {
                None
            };
            Ok(Token::Parameter(SqlParameter::List { ty, values }))
        }
        TAG_STATEMENT => {
            let count = r.len()?;
            let mut tokens = Vec::with_capacity(count.min(r.remaining()));
            for _ in 0..count {
                tokens.push(decode_token(r)?);
            }
            Ok(Token::Statement(SqlStatement::of(tokens)))
        }
        tag => Err(Error::UnsupportedToken { tag }),
    }
}

fn decode_value(ty: SqlType, r: &mut Reader<'_>) -> Result<SqlValue, Error> {
    match ty {
        SqlType::Boolean => Ok(SqlValue::Bool(r.u8()? != 0)),
        SqlType::Integer => Ok(SqlValue::Int(r.i64()?)),
        SqlType::Float => Ok(SqlValue::Float(f64::from_bits(r.u64()?))),
        SqlType::String => Ok(SqlValue::String(r.string()?)),
        SqlType::Decimal => Ok(SqlValue::Decimal(r.string()?.parse()?)),
        SqlType::Timestamp => {
            let secs = r.i64()?;
            let nanos = r.u32()?;
            DateTime::from_timestamp(secs, nanos)
                .map(SqlValue::Timestamp)
                .ok_or(Error::TimestampOutOfRange { secs, nanos })
        }
    }
}

fn kind_tag(ty: SqlType) -> u8 {
    match ty {
        SqlType::Boolean => KIND_BOOLEAN,
        SqlType::Integer => KIND_INTEGER,
        SqlType::Float => KIND_FLOAT,
        SqlType::String => KIND_STRING,
        SqlType::Decimal => KIND_DECIMAL,
        SqlType::Timestamp => KIND_TIMESTAMP,
    }
}

fn kind_from_tag(tag: u8) -> Result<SqlType, Error> {
    match tag {
        KIND_BOOLEAN => Ok(SqlType::Boolean),
        KIND_INTEGER => Ok(SqlType::Integer),
        KIND_FLOAT => Ok(SqlType::Float),
        KIND_STRING => Ok(SqlType::String),
        KIND_DECIMAL => Ok(SqlType::Decimal),
        KIND_TIMESTAMP => Ok(SqlType::Timestamp),
        tag => Err(Error::UnknownTypeTag { tag }),
    }
}

fn put_len(buf: &mut Vec<u8>, len: usize) {
    let len = u32::try_from(len).expect("marker payload segment exceeds u32::MAX");
    buf.extend_from_slice(&len.to_le_bytes());
}

fn put_str(buf: &mut Vec<u8>, s: &str) {
    put_len(buf, s.len());
    buf.extend_from_slice(s.as_bytes());
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or(Error::Truncated { offset: self.pos })?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32, Error> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(raw))
    }

    fn u64(&mut self) -> Result<u64, Error> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(raw))
    }

    fn i64(&mut self) -> Result<i64, Error> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(self.take(8)?);
        Ok(i64::from_le_bytes(raw))
    }

    fn len(&mut self) -> Result<usize, Error> {
        Ok(self.u32()? as usize)
    }

    fn string(&mut self) -> Result<String, Error> {
        let len = self.len()?;
        Ok(String::from_utf8(self.take(len)?.to_vec())?)
    }
}
