//! Structural YAML events exchanged between the engine and its event source or sink.
//!
//! The vocabulary is deliberately closed: stream and document envelopes, container
//! starts/ends and scalars. Anchors, aliases and comments are not represented.

use std::borrow::Cow;
use std::fmt;

pub use saphyr_parser::ScalarStyle;

use crate::error::{Error, ErrorKind};

/// Canonical tag of a scalar produced by [`Encoder::write_bool`](crate::Encoder::write_bool).
pub const TAG_BOOL: &str = "tag:yaml.org,2002:bool";
/// Canonical tag of a scalar produced by [`Encoder::write_int`](crate::Encoder::write_int).
pub const TAG_INT: &str = "tag:yaml.org,2002:int";
/// Canonical tag of a scalar produced by [`Encoder::write_string`](crate::Encoder::write_string).
pub const TAG_STR: &str = "tag:yaml.org,2002:str";

/// A scalar value with its presentation style.
#[derive(Clone, Debug, PartialEq)]
pub struct Scalar {
    /// Scalar text after unescaping.
    pub value: String,
    /// Presentation style as written in (or requested for) the document.
    pub style: ScalarStyle,
    /// Resolved tag, if any was written explicitly or requested by the encoder.
    pub tag: Option<String>,
}

impl Scalar {
    /// Plain, untagged scalar.
    pub fn plain<S: Into<String>>(value: S) -> Self {
        Scalar {
            value: value.into(),
            style: ScalarStyle::Plain,
            tag: None,
        }
    }

    pub(crate) fn tagged<S: Into<String>>(value: S, style: ScalarStyle, tag: &str) -> Self {
        Scalar {
            value: value.into(),
            style,
            tag: Some(tag.to_owned()),
        }
    }
}

/// One structural event.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    MappingStart,
    MappingEnd,
    SequenceStart,
    SequenceEnd,
    Scalar(Scalar),
}

impl Event {
    /// Payload-free discriminant of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::StreamStart => EventKind::StreamStart,
            Event::StreamEnd => EventKind::StreamEnd,
            Event::DocumentStart => EventKind::DocumentStart,
            Event::DocumentEnd => EventKind::DocumentEnd,
            Event::MappingStart => EventKind::MappingStart,
            Event::MappingEnd => EventKind::MappingEnd,
            Event::SequenceStart => EventKind::SequenceStart,
            Event::SequenceEnd => EventKind::SequenceEnd,
            Event::Scalar(_) => EventKind::Scalar,
        }
    }

    /// Shorthand for a plain scalar event.
    pub fn plain<S: Into<String>>(value: S) -> Self {
        Event::Scalar(Scalar::plain(value))
    }

    /// Translate a parser event.
    ///
    /// Returns `Ok(None)` for events that carry no structure (`Nothing`). Aliases are
    /// rejected: anchors are outside this engine's vocabulary.
    pub(crate) fn from_parser(raw: saphyr_parser::Event<'_>) -> Result<Option<Event>, Error> {
        let ev = match raw {
            saphyr_parser::Event::Nothing => return Ok(None),
            saphyr_parser::Event::StreamStart => Event::StreamStart,
            saphyr_parser::Event::StreamEnd => Event::StreamEnd,
            saphyr_parser::Event::DocumentStart(_) => Event::DocumentStart,
            saphyr_parser::Event::DocumentEnd => Event::DocumentEnd,
            saphyr_parser::Event::MappingStart(_, _) => Event::MappingStart,
            saphyr_parser::Event::MappingEnd => Event::MappingEnd,
            saphyr_parser::Event::SequenceStart(_, _) => Event::SequenceStart,
            saphyr_parser::Event::SequenceEnd => Event::SequenceEnd,
            saphyr_parser::Event::Scalar(value, style, _anchor, tag) => {
                let value = match value {
                    Cow::Borrowed(v) => v.to_string(),
                    Cow::Owned(v) => v,
                };
                Event::Scalar(Scalar {
                    value,
                    style,
                    tag: tag.map(|t| t.to_string()),
                })
            }
            saphyr_parser::Event::Alias(_) => {
                return Err(Error::with_detail(
                    ErrorKind::UnexpectedEvent,
                    "aliases are not supported",
                ));
            }
        };
        Ok(Some(ev))
    }
}

/// Discriminant of [`Event`], used for cheap checks and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    MappingStart,
    MappingEnd,
    SequenceStart,
    SequenceEnd,
    Scalar,
}

impl EventKind {
    /// True for the events that begin a value: container starts and scalars.
    pub fn is_content(self) -> bool {
        matches!(
            self,
            EventKind::MappingStart | EventKind::SequenceStart | EventKind::Scalar
        )
    }

    /// True for document or stream end.
    pub fn is_terminal(self) -> bool {
        matches!(self, EventKind::DocumentEnd | EventKind::StreamEnd)
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            EventKind::StreamStart => "stream start",
            EventKind::StreamEnd => "stream end",
            EventKind::DocumentStart => "document start",
            EventKind::DocumentEnd => "document end",
            EventKind::MappingStart => "mapping start",
            EventKind::MappingEnd => "mapping end",
            EventKind::SequenceStart => "sequence start",
            EventKind::SequenceEnd => "sequence end",
            EventKind::Scalar => "scalar",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_and_terminal_kinds() {
        assert!(EventKind::Scalar.is_content());
        assert!(EventKind::MappingStart.is_content());
        assert!(!EventKind::MappingEnd.is_content());
        assert!(EventKind::StreamEnd.is_terminal());
        assert!(!EventKind::DocumentStart.is_terminal());
    }

    #[test]
    fn parser_scalar_is_copied_with_style() {
        let raw = saphyr_parser::Event::Scalar(
            Cow::Borrowed("hello"),
            ScalarStyle::SingleQuoted,
            0,
            None,
        );
        let ev = Event::from_parser(raw).expect("scalar").expect("some");
        assert_eq!(
            ev,
            Event::Scalar(Scalar {
                value: "hello".into(),
                style: ScalarStyle::SingleQuoted,
                tag: None,
            })
        );
    }

    #[test]
    fn parser_alias_is_rejected() {
        let err = Event::from_parser(saphyr_parser::Event::Alias(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEvent);
    }
}
