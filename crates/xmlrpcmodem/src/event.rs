//! The event contract between the XML tokenizer adapter and the decoder.

/// One low-level XML parsing event.
///
/// Element names are the raw tag names as they appear on the wire. Text is
/// entity-decoded by the adapter and may arrive in multiple fragments when a
/// chunk boundary falls inside character data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum XmlEvent {
    Open(String),
    Text(String),
    Close(String),
}
