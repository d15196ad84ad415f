//! The structural stack machine: folds a flat event stream into nested
//! values.
//!
//! One [`Frame`] is pushed per open `<value>` or `<member>`, so stack depth
//! tracks the document's nesting depth exactly and unbounded nesting needs no
//! call-stack recursion. A child folds into its parent only when its own
//! subtree has fully closed; no partially built value is ever observable.

use crate::error::GrammarError;
use crate::event::XmlEvent;
use crate::scalar::{self, ScalarTag};
use crate::value::{Map, Value};

/// One open structural context.
#[derive(Debug)]
enum Frame {
    Value(ValueState),
    Member(MemberState),
}

#[derive(Debug)]
enum ValueState {
    /// `<value>` seen, nothing else yet.
    Empty,
    /// Untyped character data; resolves to a string.
    Bare(String),
    /// A scalar leaf accumulating its text. `name` is the open tag as
    /// written, so `<int>` closed by `</i4>` is rejected.
    Leaf {
        tag: ScalarTag,
        name: String,
        buf: String,
    },
    /// `in_data` is true between `<data>` and `</data>`, the only region
    /// where element values may appear.
    Array { items: Vec<Value>, in_data: bool },
    Struct { members: Map },
    /// The inner tag closed; waiting for `</value>`.
    Done(Value),
}

#[derive(Debug)]
enum MemberState {
    Start,
    InName(String),
    Named(String),
    Valued(String, Value),
}

/// The value-builder state machine. The coordinator hands it every event
/// while a `<value>` subtree is open.
#[derive(Debug, Default)]
pub(crate) struct ValueMachine {
    stack: Vec<Frame>,
}

impl ValueMachine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// True when no `<value>` subtree is open.
    pub(crate) fn is_idle(&self) -> bool {
        self.stack.is_empty()
    }

    /// Feeds one event. Returns the finished root value once the outermost
    /// `<value>` closes; any unexpected event aborts the parse operation.
    pub(crate) fn handle(&mut self, event: XmlEvent) -> Result<Option<Value>, GrammarError> {
        match event {
            XmlEvent::Open(name) => self.open(&name).map(|()| None),
            XmlEvent::Text(content) => self.text(content).map(|()| None),
            XmlEvent::Close(name) => self.close(&name),
        }
    }

    fn open(&mut self, name: &str) -> Result<(), GrammarError> {
        let unexpected = || GrammarError::UnexpectedOpen(name.to_owned());

        // Positions that open a nested frame.
        match self.stack.last() {
            None
            | Some(Frame::Value(ValueState::Array { in_data: true, .. }))
            | Some(Frame::Member(MemberState::Named(_))) => {
                return if name == "value" {
                    self.stack.push(Frame::Value(ValueState::Empty));
                    Ok(())
                } else {
                    Err(unexpected())
                };
            }
            Some(Frame::Value(ValueState::Struct { .. })) => {
                return if name == "member" {
                    self.stack.push(Frame::Member(MemberState::Start));
                    Ok(())
                } else {
                    Err(unexpected())
                };
            }
            _ => {}
        }

        // Positions that refine the current frame in place.
        match self.stack.last_mut() {
            Some(Frame::Value(state)) => match state {
                ValueState::Empty | ValueState::Bare(_) => {
                    if let ValueState::Bare(buf) = state {
                        // only formatting noise may precede an inner tag
                        if !buf.trim().is_empty() {
                            return Err(GrammarError::UnexpectedText);
                        }
                    }
                    *state = if name == "array" {
                        ValueState::Array {
                            items: Vec::new(),
                            in_data: false,
                        }
                    } else if name == "struct" {
                        ValueState::Struct {
                            members: Map::new(),
                        }
                    } else if let Some(tag) = ScalarTag::from_name(name) {
                        ValueState::Leaf {
                            tag,
                            name: name.to_owned(),
                            buf: String::new(),
                        }
                    } else {
                        return Err(unexpected());
                    };
                    Ok(())
                }
                ValueState::Array { in_data, .. } if !*in_data => {
                    if name == "data" {
                        *in_data = true;
                        Ok(())
                    } else {
                        Err(unexpected())
                    }
                }
                _ => Err(unexpected()),
            },
            Some(Frame::Member(state)) => match state {
                MemberState::Start => {
                    if name == "name" {
                        *state = MemberState::InName(String::new());
                        Ok(())
                    } else {
                        Err(unexpected())
                    }
                }
                _ => Err(unexpected()),
            },
            None => Err(unexpected()),
        }
    }

    fn text(&mut self, content: String) -> Result<(), GrammarError> {
        match self.stack.last_mut() {
            Some(Frame::Value(state)) => match state {
                ValueState::Leaf { buf, .. } | ValueState::Bare(buf) => {
                    buf.push_str(&content);
                    Ok(())
                }
                ValueState::Empty => {
                    *state = ValueState::Bare(content);
                    Ok(())
                }
                _ => ignore_if_whitespace(&content),
            },
            Some(Frame::Member(state)) => match state {
                MemberState::InName(buf) => {
                    buf.push_str(&content);
                    Ok(())
                }
                _ => ignore_if_whitespace(&content),
            },
            None => ignore_if_whitespace(&content),
        }
    }

    fn close(&mut self, name: &str) -> Result<Option<Value>, GrammarError> {
        let unexpected = || GrammarError::UnexpectedClose(name.to_owned());
        match self.stack.last_mut() {
            Some(Frame::Value(state)) => match state {
                ValueState::Leaf {
                    tag,
                    name: open_name,
                    buf,
                } => {
                    if name != open_name {
                        return Err(unexpected());
                    }
                    let value = scalar::convert(*tag, buf)?;
                    *state = ValueState::Done(value);
                    Ok(None)
                }
                ValueState::Array { items, in_data } => {
                    if *in_data && name == "data" {
                        *in_data = false;
                        Ok(None)
                    } else if !*in_data && name == "array" {
                        let items = std::mem::take(items);
                        *state = ValueState::Done(Value::Array(items));
                        Ok(None)
                    } else {
                        Err(unexpected())
                    }
                }
                ValueState::Struct { members } => {
                    if name == "struct" {
                        let members = std::mem::take(members);
                        *state = ValueState::Done(Value::Struct(members));
                        Ok(None)
                    } else {
                        Err(unexpected())
                    }
                }
                ValueState::Empty | ValueState::Bare(_) | ValueState::Done(_) => {
                    if name != "value" {
                        return Err(unexpected());
                    }
                    let finished = match std::mem::replace(state, ValueState::Empty) {
                        ValueState::Empty => Value::String(String::new()),
                        ValueState::Bare(text) => Value::String(text),
                        ValueState::Done(value) => value,
                        _ => unreachable!("arm matched Empty | Bare | Done"),
                    };
                    self.stack.pop();
                    self.fold(finished)
                }
            },
            Some(Frame::Member(state)) => match state {
                MemberState::InName(buf) => {
                    if name != "name" {
                        return Err(unexpected());
                    }
                    // surrounding formatting whitespace is not part of the key
                    let key = buf.trim().to_owned();
                    *state = MemberState::Named(key);
                    Ok(None)
                }
                MemberState::Valued(..) => {
                    if name != "member" {
                        return Err(unexpected());
                    }
                    let MemberState::Valued(key, value) =
                        std::mem::replace(state, MemberState::Start)
                    else {
                        unreachable!("arm matched Valued");
                    };
                    self.stack.pop();
                    match self.stack.last_mut() {
                        Some(Frame::Value(ValueState::Struct { members })) => {
                            // duplicate keys resolve last-write-wins
                            members.insert(key, value);
                            Ok(None)
                        }
                        _ => Err(unexpected()),
                    }
                }
                _ => Err(unexpected()),
            },
            None => Err(unexpected()),
        }
    }

    /// Folds a completed value into the enclosing frame, or returns it when
    /// the stack has emptied.
    fn fold(&mut self, value: Value) -> Result<Option<Value>, GrammarError> {
        match self.stack.last_mut() {
            None => Ok(Some(value)),
            Some(Frame::Value(ValueState::Array {
                items,
                in_data: true,
            })) => {
                items.push(value);
                Ok(None)
            }
            Some(Frame::Member(state)) => {
                if let MemberState::Named(key) = state {
                    let key = std::mem::take(key);
                    *state = MemberState::Valued(key, value);
                    Ok(None)
                } else {
                    Err(GrammarError::UnexpectedClose("value".to_owned()))
                }
            }
            _ => Err(GrammarError::UnexpectedClose("value".to_owned())),
        }
    }
}

fn ignore_if_whitespace(content: &str) -> Result<(), GrammarError> {
    if content.trim().is_empty() {
        Ok(())
    } else {
        Err(GrammarError::UnexpectedText)
    }
}
