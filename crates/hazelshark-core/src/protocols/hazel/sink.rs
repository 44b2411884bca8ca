use super::record::{DecodedField, Message};

/// Receives fields and messages in decode order, as soon as each is produced.
///
/// Hosts use this to build their own display tree while decoding. `()`
/// ignores everything.
pub trait FieldSink {
    fn on_field(&mut self, field: &DecodedField);
    fn on_message(&mut self, message: &Message<'_>);
}

impl FieldSink for () {
    fn on_field(&mut self, _field: &DecodedField) {}
    fn on_message(&mut self, _message: &Message<'_>) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Field(String),
    Message { tag: String, start: usize, len: usize },
}

/// Sink that keeps a rendered line per event.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl FieldSink for RecordingSink {
    fn on_field(&mut self, field: &DecodedField) {
        self.events.push(SinkEvent::Field(field.to_string()));
    }

    fn on_message(&mut self, message: &Message<'_>) {
        self.events.push(SinkEvent::Message {
            tag: message.tag.to_string(),
            start: message.range.start,
            len: message.range.len,
        });
    }
}
