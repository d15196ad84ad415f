//! Event source adapter: turns chunked XML text into [`XmlEvent`]s.
//!
//! Tokenization itself is delegated to `quick-xml`; this module owns the
//! pending-text buffer and the chunk-boundary bookkeeping that makes the
//! tokenizer safe to drive incrementally.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::event::XmlEvent;

/// Accumulates fed text and tokenizes the prefix that is known to be
/// complete. A trailing partial tag, entity reference, CDATA section or
/// comment is held back until more input arrives or the stream is closed.
#[derive(Debug, Default)]
pub(crate) struct EventSource {
    pending: String,
}

impl EventSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn feed(&mut self, chunk: &str) {
        self.pending.push_str(chunk);
    }

    /// Tokenizes everything that is safely complete, consuming it from the
    /// buffer. `end_of_input` releases any held-back tail, so a truncated
    /// document surfaces as a tokenizer failure here rather than stalling.
    pub(crate) fn drain(&mut self, end_of_input: bool) -> Result<Vec<XmlEvent>, quick_xml::Error> {
        let safe = safe_prefix_len(&self.pending, end_of_input);
        let mut events = Vec::new();
        {
            let mut reader = Reader::from_str(&self.pending[..safe]);
            // End-tag balance is the grammar's concern; fragments tokenized
            // per drain are not balanced on their own.
            reader.config_mut().check_end_names = false;
            reader.config_mut().allow_unmatched_ends = true;
            loop {
                match reader.read_event()? {
                    Event::Start(e) => {
                        events.push(XmlEvent::Open(name_of(e.name().as_ref())));
                    }
                    Event::End(e) => {
                        events.push(XmlEvent::Close(name_of(e.name().as_ref())));
                    }
                    Event::Empty(e) => {
                        let name = name_of(e.name().as_ref());
                        events.push(XmlEvent::Open(name.clone()));
                        events.push(XmlEvent::Close(name));
                    }
                    Event::Text(t) => {
                        events.push(XmlEvent::Text(t.unescape()?.into_owned()));
                    }
                    Event::CData(t) => {
                        events.push(XmlEvent::Text(
                            String::from_utf8_lossy(&t.into_inner()).into_owned(),
                        ));
                    }
                    Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => {}
                    Event::Eof => break,
                }
            }
        }
        self.pending.drain(..safe);
        Ok(events)
    }
}

fn name_of(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Length of the prefix that can be tokenized without risking a spurious
/// truncation error at a chunk boundary.
fn safe_prefix_len(s: &str, end_of_input: bool) -> usize {
    if end_of_input {
        return s.len();
    }
    let mut safe = s.len();
    // A `<` with no following `>` is a partially delivered tag.
    if let Some(i) = s.rfind('<') {
        if !s[i..].contains('>') {
            safe = i;
        }
    }
    // A `&` with no terminating `;` is a partially delivered entity.
    if let Some(i) = s[..safe].rfind('&') {
        if !s[i..safe].contains(';') && !s[i..safe].contains('<') {
            safe = i;
        }
    }
    // CDATA and comments may legally contain `>`, so the tag check above can
    // let a truncated section through.
    for (open, close) in [("<![CDATA[", "]]>"), ("<!--", "-->")] {
        if let Some(i) = s[..safe].rfind(open) {
            if !s[i..safe].contains(close) {
                safe = i;
            }
        }
    }
    safe
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(name: &str) -> XmlEvent {
        XmlEvent::Open(name.to_owned())
    }
    fn close(name: &str) -> XmlEvent {
        XmlEvent::Close(name.to_owned())
    }
    fn text(content: &str) -> XmlEvent {
        XmlEvent::Text(content.to_owned())
    }

    #[test]
    fn whole_document_in_one_chunk() {
        let mut source = EventSource::new();
        source.feed("<value><int>5</int></value>");
        assert_eq!(
            source.drain(true).unwrap(),
            vec![
                open("value"),
                open("int"),
                text("5"),
                close("int"),
                close("value"),
            ]
        );
    }

    #[test]
    fn partial_tag_is_held_back() {
        let mut source = EventSource::new();
        source.feed("<va");
        assert_eq!(source.drain(false).unwrap(), vec![]);
        source.feed("lue>");
        assert_eq!(source.drain(false).unwrap(), vec![open("value")]);
    }

    #[test]
    fn partial_entity_is_held_back() {
        let mut source = EventSource::new();
        source.feed("<string>a&am");
        assert_eq!(source.drain(false).unwrap(), vec![open("string"), text("a")]);
        source.feed("p;b</string>");
        assert_eq!(
            source.drain(false).unwrap(),
            vec![text("&b"), close("string")]
        );
    }

    #[test]
    fn text_may_arrive_in_fragments() {
        let mut source = EventSource::new();
        source.feed("<string>foo");
        assert_eq!(
            source.drain(false).unwrap(),
            vec![open("string"), text("foo")]
        );
        source.feed("bar</string>");
        assert_eq!(
            source.drain(false).unwrap(),
            vec![text("bar"), close("string")]
        );
    }

    #[test]
    fn empty_elements_expand_to_open_close() {
        let mut source = EventSource::new();
        source.feed("<value><string/></value>");
        assert_eq!(
            source.drain(true).unwrap(),
            vec![
                open("value"),
                open("string"),
                close("string"),
                close("value"),
            ]
        );
    }

    #[test]
    fn prolog_and_doctype_are_skipped() {
        let mut source = EventSource::new();
        source.feed("<?xml version=\"1.0\"?><!DOCTYPE methodResponse><methodResponse/>");
        assert_eq!(
            source.drain(true).unwrap(),
            vec![open("methodResponse"), close("methodResponse")]
        );
    }

    #[test]
    fn entities_are_decoded() {
        let mut source = EventSource::new();
        source.feed("<string>test\n\n&lt;test&gt;</string>");
        assert_eq!(
            source.drain(true).unwrap(),
            vec![open("string"), text("test\n\n<test>"), close("string")]
        );
    }

    #[test]
    fn truncated_document_errors_at_end_of_input() {
        let mut source = EventSource::new();
        source.feed("<methodResponse><params><param");
        assert!(source.drain(false).is_ok());
        assert!(source.drain(true).is_err());
    }
}
