//! A streaming, incremental XML-RPC parser.
//!
//! Decodes XML-RPC `methodCall` and `methodResponse` documents into typed
//! [`Value`]s. Input may be delivered in a single call or in arbitrary text
//! chunks as it streams in; the parser's structural context persists between
//! chunks, so boundaries may fall mid-tag, mid-text or mid-entity.
//!
//! # Examples
//!
//! ```
//! use xmlrpcmodem::{Value, parse_method_response};
//!
//! let xml = "<methodResponse><params>\
//!     <param><value><int>42</int></value></param>\
//!     </params></methodResponse>";
//! assert_eq!(parse_method_response(xml), Ok(Value::Int(42)));
//! ```
//!
//! Chunked delivery uses the parser types directly:
//!
//! ```
//! use xmlrpcmodem::{CallParser, Value};
//!
//! let mut parser = CallParser::new();
//! parser.feed("<methodCall><methodName>echo</methodName><par");
//! parser.feed("ams><param><value><string>hi</string></value></param></params></methodCall>");
//! let call = parser.close().unwrap();
//! assert_eq!(call.name, "echo");
//! assert_eq!(call.params, vec![Value::String("hi".into())]);
//! ```

mod error;
mod event;
mod machine;
mod parser;
mod scalar;
mod source;
mod value;

#[cfg(test)]
mod tests;

pub use error::{CallError, ResponseError};
pub use parser::{CallParser, MethodCall, ResponseParser, parse_method_call, parse_method_response};
pub use value::{Array, DateTime, Map, Value};
