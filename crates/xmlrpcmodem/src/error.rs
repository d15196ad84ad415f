//! Error types.
//!
//! Internally the decoder distinguishes tokenizer failures, grammar
//! violations and scalar conversion failures; at the public boundary they all
//! normalize into one fixed failure value per entry point, so callers never
//! see raw diagnostics.

use thiserror::Error;

use crate::scalar::ScalarError;

/// Failure of a `methodResponse` parse operation.
///
/// Malformed XML and XML-RPC grammar violations both surface as
/// [`InvalidResponse`]. A well-formed `<fault>` is success from the
/// protocol's perspective and surfaces as [`Fault`]; it is never confused
/// with a structural failure and its `Display` is exactly the fault string.
///
/// [`InvalidResponse`]: ResponseError::InvalidResponse
/// [`Fault`]: ResponseError::Fault
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ResponseError {
    /// The document was not a valid `methodResponse`.
    #[error("Invalid method response.")]
    InvalidResponse,
    /// The server answered with a `<fault>`.
    #[error("{fault_string}")]
    Fault {
        /// `faultCode` member of the fault struct.
        fault_code: i64,
        /// `faultString` member of the fault struct.
        fault_string: String,
    },
}

/// Failure of a `methodCall` parse operation.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("Invalid method call.")]
pub struct CallError;

/// An event that violates the XML-RPC grammar for the active entry point.
/// Never exposed directly; the coordinator folds it into the entry point's
/// fixed error value.
#[derive(Clone, Debug, Error, PartialEq)]
pub(crate) enum GrammarError {
    #[error("unexpected <{0}>")]
    UnexpectedOpen(String),
    #[error("unexpected </{0}>")]
    UnexpectedClose(String),
    #[error("unexpected character data")]
    UnexpectedText,
    #[error("more than one <param> in a method response")]
    ExtraParam,
    #[error(transparent)]
    Scalar(#[from] ScalarError),
}
