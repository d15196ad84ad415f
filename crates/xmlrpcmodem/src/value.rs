//! XML-RPC value types.
//!
//! This module defines the [`Value`] enum, which represents any value the
//! classic XML-RPC type set can carry, along with the [`DateTime`] record used
//! by `<dateTime.iso8601>`.

use std::collections::BTreeMap;

/// The member map of an XML-RPC `<struct>`.
pub type Map = BTreeMap<String, Value>;
/// The element sequence of an XML-RPC `<array>`.
pub type Array = Vec<Value>;

/// A calendar date and time as carried by `<dateTime.iso8601>`.
///
/// XML-RPC datetimes carry no timezone; the fields are exactly what the wire
/// text spells out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime {
    /// Four-digit year.
    pub year: u16,
    /// Month, 1-12.
    pub month: u8,
    /// Day of month, 1-31.
    pub day: u8,
    /// Hour, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
    /// Second, 0-59.
    pub second: u8,
}

/// An XML-RPC value.
///
/// `Value` can represent every type in the classic XML-RPC wire grammar:
/// integers (`int`/`i4`/`i8`), doubles, booleans, strings, datetimes, base64
/// byte payloads, arrays, and structs.
///
/// Struct equality compares key/value sets; member insertion order is not
/// observable.
///
/// # Examples
///
/// ```
/// use xmlrpcmodem::{Map, Value};
///
/// let mut members = Map::new();
/// members.insert("key".to_string(), Value::String("value".into()));
/// let v = Value::Struct(members);
/// assert!(v.as_struct().is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `<int>`, `<i4>` or `<i8>`.
    Int(i64),
    /// `<double>`.
    Double(f64),
    /// `<boolean>`.
    Boolean(bool),
    /// `<string>`, or a `<value>` with no inner type tag.
    String(String),
    /// `<dateTime.iso8601>`.
    DateTime(DateTime),
    /// `<base64>`, already decoded.
    Bytes(Vec<u8>),
    /// `<array>`, in wire order.
    Array(Array),
    /// `<struct>`.
    Struct(Map),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<DateTime> for Value {
    fn from(v: DateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Struct(v)
    }
}

impl Value {
    /// Returns the integer if this is an [`Int`], otherwise `None`.
    ///
    /// [`Int`]: Value::Int
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let Self::Int(v) = self { Some(*v) } else { None }
    }

    /// Returns the float if this is a [`Double`], otherwise `None`.
    ///
    /// [`Double`]: Value::Double
    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        if let Self::Double(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// Returns the boolean if this is a [`Boolean`], otherwise `None`.
    ///
    /// [`Boolean`]: Value::Boolean
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Boolean(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// Returns the text if this is a [`String`], otherwise `None`.
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Returns the datetime if this is a [`DateTime`], otherwise `None`.
    ///
    /// [`DateTime`]: Value::DateTime
    #[must_use]
    pub fn as_datetime(&self) -> Option<DateTime> {
        if let Self::DateTime(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// Returns the decoded payload if this is [`Bytes`], otherwise `None`.
    ///
    /// [`Bytes`]: Value::Bytes
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        if let Self::Bytes(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Returns the elements if this is an [`Array`], otherwise `None`.
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        if let Self::Array(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Returns the members if this is a [`Struct`], otherwise `None`.
    ///
    /// [`Struct`]: Value::Struct
    #[must_use]
    pub fn as_struct(&self) -> Option<&Map> {
        if let Self::Struct(v) = self {
            Some(v)
        } else {
            None
        }
    }
}
