//! Block-style YAML text emitter driven by structural events.
//!
//! The emitter keeps one frame per open container and decides placement (new line,
//! indentation, `- ` markers, `key:` separators) from the frame on top of the stack.
//! Output is written into any `fmt::Write`; the encoder forwards it to its sink.

use std::fmt::{self, Write};

use crate::error::{Error, ErrorKind};
use crate::event::{Event, EventKind, Scalar, ScalarStyle, TAG_BOOL, TAG_INT};
use crate::options::EncoderOptions;
use crate::ser_quoting::{is_plain_safe, is_plain_value_safe, needs_double_quotes};

/// How a container was entered; decides where its first entry goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Entered {
    /// Document root, at the start of a line.
    Root,
    /// Value of a mapping key: the first entry starts on the next line.
    AfterKey,
    /// Element of a sequence: the first entry continues the `- ` line.
    AfterDash,
}

#[derive(Debug)]
enum Frame {
    Map {
        indent: usize,
        entered: Entered,
        entries: usize,
        awaiting_value: bool,
    },
    Seq {
        indent: usize,
        entered: Entered,
        items: usize,
    },
}

/// Longest key text the parser accepts in `key: value` form; longer keys use `? key`.
const MAX_IMPLICIT_KEY: usize = 1024;

/// Where the next node lands.
#[derive(Clone, Copy, Debug)]
enum Slot {
    Root,
    /// Key of an entry in a mapping at `indent`.
    Key { indent: usize },
    /// Value of a key in a mapping at `indent`.
    Value { indent: usize },
    /// Element of a sequence at `indent`, after its `- ` marker.
    Item { indent: usize },
}

/// Text emitter state for one stream.
#[derive(Debug)]
pub(crate) struct Emitter {
    options: EncoderOptions,
    stack: Vec<Frame>,
    stream_open: bool,
    stream_closed: bool,
    in_document: bool,
    root_written: bool,
    documents: usize,
    at_line_start: bool,
}

#[cold]
fn protocol(message: impl Into<String>) -> Error {
    Error::with_detail(ErrorKind::UnknownError, message)
}

impl Emitter {
    pub(crate) fn new(options: EncoderOptions) -> Self {
        Emitter {
            options,
            stack: Vec::new(),
            stream_open: false,
            stream_closed: false,
            in_document: false,
            root_written: false,
            documents: 0,
            at_line_start: true,
        }
    }

    /// Emit one event as YAML text into `out`.
    pub(crate) fn emit<W: Write>(&mut self, ev: &Event, out: &mut W) -> Result<(), Error> {
        match ev {
            Event::StreamStart => {
                if self.stream_open || self.stream_closed {
                    return Err(protocol("stream already started"));
                }
                self.stream_open = true;
            }
            Event::StreamEnd => {
                if !self.stream_open || self.in_document {
                    return Err(protocol("stream end outside an open stream"));
                }
                self.stream_open = false;
                self.stream_closed = true;
            }
            Event::DocumentStart => {
                if !self.stream_open || self.in_document {
                    return Err(protocol("document start outside an open stream"));
                }
                if self.options.version_directive {
                    out.write_str("%YAML 1.1\n---\n")?;
                } else if self.options.explicit_document_start || self.documents > 0 {
                    out.write_str("---\n")?;
                }
                self.in_document = true;
                self.root_written = false;
                self.at_line_start = true;
            }
            Event::DocumentEnd => {
                if !self.in_document || !self.stack.is_empty() {
                    return Err(protocol("document end with open containers"));
                }
                if self.options.explicit_document_end {
                    out.write_str("...\n")?;
                }
                self.in_document = false;
                self.documents += 1;
            }
            Event::Scalar(scalar) => self.emit_scalar(scalar, out)?,
            Event::MappingStart => {
                let (indent, entered) = match self.begin_node(out, EventKind::MappingStart)? {
                    Slot::Root => (0, Entered::Root),
                    Slot::Value { indent } => (indent + self.options.indent_step, Entered::AfterKey),
                    Slot::Item { indent } => (indent + 2, Entered::AfterDash),
                    Slot::Key { .. } => return Err(protocol("mapping used as a mapping key")),
                };
                self.stack.push(Frame::Map {
                    indent,
                    entered,
                    entries: 0,
                    awaiting_value: false,
                });
            }
            Event::SequenceStart => {
                let (indent, entered) = match self.begin_node(out, EventKind::SequenceStart)? {
                    Slot::Root => (0, Entered::Root),
                    Slot::Value { indent } if self.options.indent_sequences => {
                        (indent + self.options.indent_step, Entered::AfterKey)
                    }
                    Slot::Value { indent } => (indent, Entered::AfterKey),
                    Slot::Item { indent } => (indent + 2, Entered::AfterDash),
                    Slot::Key { .. } => return Err(protocol("sequence used as a mapping key")),
                };
                self.stack.push(Frame::Seq {
                    indent,
                    entered,
                    items: 0,
                });
            }
            Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Map {
                    entered,
                    entries,
                    awaiting_value,
                    ..
                }) => {
                    if awaiting_value {
                        return Err(protocol("mapping ended after a key without a value"));
                    }
                    if entries == 0 {
                        self.write_empty(out, entered, "{}")?;
                    }
                }
                _ => return Err(protocol("mapping end without a matching start")),
            },
            Event::SequenceEnd => match self.stack.pop() {
                Some(Frame::Seq { entered, items, .. }) => {
                    if items == 0 {
                        self.write_empty(out, entered, "[]")?;
                    }
                }
                _ => return Err(protocol("sequence end without a matching start")),
            },
        }
        Ok(())
    }

    /// Account for a new node in the enclosing container and write whatever precedes it.
    fn begin_node<W: Write>(&mut self, out: &mut W, kind: EventKind) -> Result<Slot, Error> {
        let (first, entered, indent, slot) = match self.stack.last_mut() {
            None => {
                if !self.in_document {
                    return Err(protocol(format!("{kind} outside a document")));
                }
                if self.root_written {
                    return Err(protocol("document already has a root node"));
                }
                self.root_written = true;
                return Ok(Slot::Root);
            }
            Some(Frame::Map {
                indent,
                entered,
                entries,
                awaiting_value,
            }) => {
                if *awaiting_value {
                    *awaiting_value = false;
                    *entries += 1;
                    return Ok(Slot::Value { indent: *indent });
                }
                if kind != EventKind::Scalar {
                    return Ok(Slot::Key { indent: *indent });
                }
                *awaiting_value = true;
                (*entries == 0, *entered, *indent, Slot::Key { indent: *indent })
            }
            Some(Frame::Seq {
                indent,
                entered,
                items,
            }) => {
                let first = *items == 0;
                *items += 1;
                (first, *entered, *indent, Slot::Item { indent: *indent })
            }
        };
        if first && entered == Entered::AfterKey {
            self.newline(out)?;
        }
        if self.at_line_start {
            write_indent(out, indent)?;
            self.at_line_start = false;
        }
        if matches!(slot, Slot::Item { .. }) {
            out.write_str("- ")?;
        }
        Ok(slot)
    }

    fn emit_scalar<W: Write>(&mut self, scalar: &Scalar, out: &mut W) -> Result<(), Error> {
        match self.begin_node(out, EventKind::Scalar)? {
            Slot::Key { indent } => {
                let mut key = String::new();
                if is_plain_safe(&scalar.value) {
                    key.push_str(&scalar.value);
                } else {
                    write_double_quoted(&mut key, &scalar.value)?;
                }
                if key.chars().count() >= MAX_IMPLICIT_KEY {
                    out.write_str("? ")?;
                    out.write_str(&key)?;
                    self.newline(out)?;
                    write_indent(out, indent)?;
                    self.at_line_start = false;
                } else {
                    out.write_str(&key)?;
                }
                out.write_char(':')?;
            }
            Slot::Value { .. } => {
                out.write_char(' ')?;
                write_scalar(out, scalar)?;
                self.newline(out)?;
            }
            Slot::Root | Slot::Item { .. } => {
                write_scalar(out, scalar)?;
                self.newline(out)?;
            }
        }
        Ok(())
    }

    fn write_empty<W: Write>(&mut self, out: &mut W, entered: Entered, text: &str) -> Result<(), Error> {
        if entered == Entered::AfterKey {
            out.write_char(' ')?;
        }
        out.write_str(text)?;
        self.newline(out)
    }

    fn newline<W: Write>(&mut self, out: &mut W) -> Result<(), Error> {
        out.write_char('\n')?;
        self.at_line_start = true;
        Ok(())
    }
}

fn write_indent<W: Write>(out: &mut W, width: usize) -> fmt::Result {
    for _ in 0..width {
        out.write_char(' ')?;
    }
    Ok(())
}

/// Write a scalar in its requested style, falling back to double quotes when the text
/// cannot be represented that way.
fn write_scalar<W: Write>(out: &mut W, scalar: &Scalar) -> fmt::Result {
    let text = scalar.value.as_str();
    match scalar.style {
        ScalarStyle::Plain => {
            let resolved = matches!(scalar.tag.as_deref(), Some(TAG_BOOL | TAG_INT));
            if (resolved && !text.is_empty()) || is_plain_value_safe(text) {
                out.write_str(text)
            } else {
                write_double_quoted(out, text)
            }
        }
        ScalarStyle::SingleQuoted if !needs_double_quotes(text) => write_single_quoted(out, text),
        _ => write_double_quoted(out, text),
    }
}

fn write_single_quoted<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('\'')?;
    for ch in s.chars() {
        if ch == '\'' {
            out.write_str("''")?;
        } else {
            out.write_char(ch)?;
        }
    }
    out.write_char('\'')
}

fn write_double_quoted<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '\\' => out.write_str("\\\\")?,
            '"' => out.write_str("\\\"")?,
            '\0' => out.write_str("\\0")?,
            '\u{7}' => out.write_str("\\a")?,
            '\u{8}' => out.write_str("\\b")?,
            '\t' => out.write_str("\\t")?,
            '\n' => out.write_str("\\n")?,
            '\u{b}' => out.write_str("\\v")?,
            '\u{c}' => out.write_str("\\f")?,
            '\r' => out.write_str("\\r")?,
            '\u{1b}' => out.write_str("\\e")?,
            '\u{FEFF}' => out.write_str("\\uFEFF")?,
            '\u{0085}' => out.write_str("\\N")?,
            '\u{2028}' => out.write_str("\\L")?,
            '\u{2029}' => out.write_str("\\P")?,
            c if c.is_control() && (c as u32) <= 0xFF => write!(out, "\\x{:02X}", c as u32)?,
            c if c.is_control() => write!(out, "\\u{:04X}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}
