//! Leaf tag conversion: scalar element text to typed values.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use thiserror::Error;

use crate::value::{DateTime, Value};

/// The XML-RPC scalar tags. `int`, `i4` and `i8` share one conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScalarTag {
    Int,
    Double,
    Boolean,
    Str,
    DateTime,
    Base64,
}

impl ScalarTag {
    /// Classifies an element name, returning `None` for non-scalar tags.
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" | "i4" | "i8" => Some(Self::Int),
            "double" => Some(Self::Double),
            "boolean" => Some(Self::Boolean),
            "string" => Some(Self::Str),
            "dateTime.iso8601" => Some(Self::DateTime),
            "base64" => Some(Self::Base64),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub(crate) enum ScalarError {
    #[error("invalid integer text {0:?}")]
    InvalidInt(String),
    #[error("invalid double text {0:?}")]
    InvalidDouble(String),
    #[error("invalid boolean text {0:?}")]
    InvalidBoolean(String),
    #[error("invalid dateTime.iso8601 text {0:?}")]
    InvalidDateTime(String),
    #[error("invalid base64 payload")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Converts the accumulated character data of one scalar leaf.
///
/// Pure: no state, no side effects. Structural whitespace never reaches this
/// function; whatever text the leaf accumulated is what gets converted.
pub(crate) fn convert(tag: ScalarTag, text: &str) -> Result<Value, ScalarError> {
    match tag {
        ScalarTag::Int => parse_int(text),
        ScalarTag::Double => text
            .trim()
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| ScalarError::InvalidDouble(text.to_owned())),
        ScalarTag::Boolean => match text {
            "1" => Ok(Value::Boolean(true)),
            "0" => Ok(Value::Boolean(false)),
            _ => Err(ScalarError::InvalidBoolean(text.to_owned())),
        },
        ScalarTag::Str => Ok(Value::String(text.to_owned())),
        ScalarTag::DateTime => parse_datetime(text).map(Value::DateTime),
        ScalarTag::Base64 => {
            let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            Ok(Value::Bytes(BASE64.decode(compact)?))
        }
    }
}

/// Integer text may be fractional; the value truncates toward zero, so
/// `"2.26"` is 2 and `"-2.26"` is -2.
fn parse_int(text: &str) -> Result<Value, ScalarError> {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(Value::Int(n));
    }
    match trimmed.parse::<f64>() {
        #[allow(clippy::cast_possible_truncation)]
        Ok(f) if f.is_finite() => Ok(Value::Int(f.trunc() as i64)),
        _ => Err(ScalarError::InvalidInt(text.to_owned())),
    }
}

/// Exactly `YYYYMMDD"T"HH:MM:SS` — no separators in the date segment, no
/// timezone suffix.
fn parse_datetime(text: &str) -> Result<DateTime, ScalarError> {
    let err = || ScalarError::InvalidDateTime(text.to_owned());
    let trimmed = text.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() != 17 || bytes[8] != b'T' || bytes[11] != b':' || bytes[14] != b':' {
        return Err(err());
    }
    for (i, b) in bytes.iter().enumerate() {
        if !matches!(i, 8 | 11 | 14) && !b.is_ascii_digit() {
            return Err(err());
        }
    }
    // All-digit slices; parse cannot fail past this point.
    let field = |range: std::ops::Range<usize>| trimmed[range].parse::<u16>().map_err(|_| err());
    #[allow(clippy::cast_possible_truncation)]
    let dt = DateTime {
        year: field(0..4)?,
        month: field(4..6)? as u8,
        day: field(6..8)? as u8,
        hour: field(9..11)? as u8,
        minute: field(12..14)? as u8,
        second: field(15..17)? as u8,
    };
    let in_range = (1..=12).contains(&dt.month)
        && (1..=31).contains(&dt.day)
        && dt.hour < 24
        && dt.minute < 60
        && dt.second < 60;
    if in_range { Ok(dt) } else { Err(err()) }
}
