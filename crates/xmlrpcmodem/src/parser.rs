//! The document coordinator: top-level XML-RPC grammar over the value
//! machine.
//!
//! [`ResponseParser`] and [`CallParser`] each represent one parse operation.
//! An operation owns its event source, machine and accumulated result
//! exclusively, and resolves exactly once: `close` consumes the parser, so
//! the one-shot delivery guarantee is enforced by the type system rather
//! than by a runtime flag.

use crate::error::{CallError, GrammarError, ResponseError};
use crate::event::XmlEvent;
use crate::machine::ValueMachine;
use crate::source::EventSource;
use crate::value::Value;

/// A decoded `<methodCall>`: the method name and its ordered parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodCall {
    /// The `<methodName>` text, trimmed of surrounding whitespace.
    pub name: String,
    /// One value per `<param>`, in document order.
    pub params: Vec<Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Call,
    Response,
}

impl Kind {
    fn root_tag(self) -> &'static str {
        match self {
            Kind::Call => "methodCall",
            Kind::Response => "methodResponse",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Before the root element opens.
    Start,
    /// Inside the root, before `<params>` / `<fault>` (calls: before
    /// `<methodName>`).
    InRoot,
    /// Inside `<methodName>`, accumulating its text.
    InMethodName,
    AfterMethodName,
    /// Inside `<params>`, between `<param>` elements.
    InParams,
    /// Inside `<param>`, before or while its value parses.
    InParam,
    AfterParamValue,
    /// Inside `<fault>`, before or while its value parses.
    InFault,
    AfterFaultValue,
    /// Body closed, awaiting the root close.
    AfterBody,
    Done,
}

#[derive(Debug)]
struct DocumentParser {
    kind: Kind,
    state: State,
    source: EventSource,
    machine: ValueMachine,
    method_name: String,
    params: Vec<Value>,
    fault: Option<Value>,
    failed: bool,
}

impl DocumentParser {
    fn new(kind: Kind) -> Self {
        Self {
            kind,
            state: State::Start,
            source: EventSource::new(),
            machine: ValueMachine::new(),
            method_name: String::new(),
            params: Vec::new(),
            fault: None,
            failed: false,
        }
    }

    fn feed(&mut self, chunk: &str) {
        if self.failed {
            return;
        }
        self.source.feed(chunk);
        self.pump(false);
    }

    /// Drains the source and steps the grammar; any failure latches, after
    /// which all further input is ignored.
    fn pump(&mut self, end_of_input: bool) {
        if self.failed {
            return;
        }
        let events = match self.source.drain(end_of_input) {
            Ok(events) => events,
            Err(_) => {
                self.failed = true;
                return;
            }
        };
        for event in events {
            if self.step(event).is_err() {
                self.failed = true;
                return;
            }
        }
    }

    /// Ends the input stream and reports whether the grammar was satisfied.
    fn finish(mut self) -> Result<Self, ()> {
        self.pump(true);
        if self.failed || self.state != State::Done {
            return Err(());
        }
        Ok(self)
    }

    fn step(&mut self, event: XmlEvent) -> Result<(), GrammarError> {
        if !self.machine.is_idle() {
            if let Some(value) = self.machine.handle(event)? {
                self.value_done(value)?;
            }
            return Ok(());
        }
        match event {
            XmlEvent::Open(name) => self.open(&name),
            XmlEvent::Close(name) => self.close_element(&name),
            XmlEvent::Text(content) => {
                if self.state == State::InMethodName {
                    self.method_name.push_str(&content);
                    Ok(())
                } else if content.trim().is_empty() {
                    Ok(())
                } else {
                    Err(GrammarError::UnexpectedText)
                }
            }
        }
    }

    fn open(&mut self, name: &str) -> Result<(), GrammarError> {
        match (self.state, name) {
            (State::Start, _) if name == self.kind.root_tag() => {
                self.state = State::InRoot;
                Ok(())
            }
            (State::InRoot, "methodName") if self.kind == Kind::Call => {
                self.state = State::InMethodName;
                Ok(())
            }
            (State::InRoot, "params") if self.kind == Kind::Response => {
                self.state = State::InParams;
                Ok(())
            }
            (State::InRoot, "fault") if self.kind == Kind::Response => {
                self.state = State::InFault;
                Ok(())
            }
            (State::AfterMethodName, "params") => {
                self.state = State::InParams;
                Ok(())
            }
            (State::InParams, "param") => {
                if self.kind == Kind::Response && !self.params.is_empty() {
                    return Err(GrammarError::ExtraParam);
                }
                self.state = State::InParam;
                Ok(())
            }
            (State::InParam | State::InFault, "value") => {
                // hand the whole <value> subtree to the machine
                let started = self.machine.handle(XmlEvent::Open(name.to_owned()))?;
                debug_assert!(started.is_none());
                Ok(())
            }
            _ => Err(GrammarError::UnexpectedOpen(name.to_owned())),
        }
    }

    fn close_element(&mut self, name: &str) -> Result<(), GrammarError> {
        match (self.state, name) {
            (State::InMethodName, "methodName") => {
                let trimmed = self.method_name.trim();
                if trimmed.is_empty() {
                    return Err(GrammarError::UnexpectedClose(name.to_owned()));
                }
                self.method_name = trimmed.to_owned();
                self.state = State::AfterMethodName;
                Ok(())
            }
            (State::AfterParamValue, "param") => {
                self.state = State::InParams;
                Ok(())
            }
            (State::InParams, "params") => {
                if self.kind == Kind::Response && self.params.len() != 1 {
                    return Err(GrammarError::UnexpectedClose(name.to_owned()));
                }
                self.state = State::AfterBody;
                Ok(())
            }
            (State::AfterFaultValue, "fault") => {
                self.state = State::AfterBody;
                Ok(())
            }
            (State::AfterBody, _) if name == self.kind.root_tag() => {
                self.state = State::Done;
                Ok(())
            }
            _ => Err(GrammarError::UnexpectedClose(name.to_owned())),
        }
    }

    fn value_done(&mut self, value: Value) -> Result<(), GrammarError> {
        match self.state {
            State::InParam => {
                self.params.push(value);
                self.state = State::AfterParamValue;
                Ok(())
            }
            State::InFault => {
                self.fault = Some(value);
                self.state = State::AfterFaultValue;
                Ok(())
            }
            _ => Err(GrammarError::UnexpectedClose("value".to_owned())),
        }
    }
}

/// Streaming parser for one `<methodResponse>` document.
///
/// # Examples
///
/// ```
/// use xmlrpcmodem::{ResponseParser, Value};
///
/// let mut parser = ResponseParser::new();
/// parser.feed("<methodResponse><params><param>");
/// parser.feed("<value><string>ok</string></value></param></params></methodResponse>");
/// assert_eq!(parser.close(), Ok(Value::String("ok".into())));
/// ```
#[derive(Debug)]
pub struct ResponseParser {
    inner: DocumentParser,
}

impl ResponseParser {
    /// Creates a parser for one `methodResponse` document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DocumentParser::new(Kind::Response),
        }
    }

    /// Feeds a chunk of document text. All work happens synchronously;
    /// failures latch internally and are reported by [`close`].
    ///
    /// [`close`]: ResponseParser::close
    pub fn feed(&mut self, chunk: &str) {
        self.inner.feed(chunk);
    }

    /// Signals end of input and resolves the operation.
    ///
    /// # Errors
    ///
    /// [`ResponseError::Fault`] for a well-formed `<fault>` response;
    /// [`ResponseError::InvalidResponse`] for malformed XML or any document
    /// that is not a valid `methodResponse`.
    pub fn close(self) -> Result<Value, ResponseError> {
        let resolved = self
            .inner
            .finish()
            .map_err(|()| ResponseError::InvalidResponse)?;
        match resolved.fault {
            None => {
                let mut params = resolved.params;
                debug_assert_eq!(params.len(), 1);
                params.pop().ok_or(ResponseError::InvalidResponse)
            }
            Some(payload) => Err(fault_error(&payload)),
        }
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

/// A fault payload must be a struct carrying an integer `faultCode` and a
/// string `faultString`; anything else is a structural failure, not a fault.
fn fault_error(payload: &Value) -> ResponseError {
    let Some(members) = payload.as_struct() else {
        return ResponseError::InvalidResponse;
    };
    let code = members.get("faultCode").and_then(Value::as_int);
    let string = members.get("faultString").and_then(Value::as_str);
    match (code, string) {
        (Some(fault_code), Some(fault_string)) => ResponseError::Fault {
            fault_code,
            fault_string: fault_string.to_owned(),
        },
        _ => ResponseError::InvalidResponse,
    }
}

/// Streaming parser for one `<methodCall>` document.
#[derive(Debug)]
pub struct CallParser {
    inner: DocumentParser,
}

impl CallParser {
    /// Creates a parser for one `methodCall` document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DocumentParser::new(Kind::Call),
        }
    }

    /// Feeds a chunk of document text.
    pub fn feed(&mut self, chunk: &str) {
        self.inner.feed(chunk);
    }

    /// Signals end of input and resolves the operation.
    ///
    /// # Errors
    ///
    /// [`CallError`] for malformed XML or any document that is not a valid
    /// `methodCall`.
    pub fn close(self) -> Result<MethodCall, CallError> {
        let resolved = self.inner.finish().map_err(|()| CallError)?;
        Ok(MethodCall {
            name: resolved.method_name,
            params: resolved.params,
        })
    }
}

impl Default for CallParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a complete `methodResponse` document in one call.
///
/// # Errors
///
/// See [`ResponseParser::close`].
pub fn parse_method_response(xml: &str) -> Result<Value, ResponseError> {
    let mut parser = ResponseParser::new();
    parser.feed(xml);
    parser.close()
}

/// Parses a complete `methodCall` document in one call.
///
/// # Errors
///
/// See [`CallParser::close`].
pub fn parse_method_call(xml: &str) -> Result<MethodCall, CallError> {
    let mut parser = CallParser::new();
    parser.feed(xml);
    parser.close()
}
