//! Push-protocol encoder session.
//!
//! An [`Encoder`] accepts a well-nested sequence of calls (`start`, `map_start`,
//! `map_key`, `write_int`, ..., `end`) and forwards the corresponding events to its
//! [`Sink`]: an in-memory string, an `io::Write` stream, or an event list that a
//! [`ReplaySource`](crate::ReplaySource) can replay into a decoder.
//!
//! ```rust
//! use yaml_visit::Encoder;
//!
//! let mut enc = Encoder::new_string();
//! enc.start().unwrap();
//! enc.map_start().unwrap();
//! enc.map_key("ports").unwrap();
//! enc.list_start().unwrap();
//! enc.write_int(8080).unwrap();
//! enc.write_int(8081).unwrap();
//! enc.list_end().unwrap();
//! enc.map_key("name").unwrap();
//! enc.write_string("demo").unwrap();
//! enc.map_end().unwrap();
//! enc.end().unwrap();
//! assert_eq!(enc.borrow_output().unwrap(), "ports:\n- 8080\n- 8081\nname: 'demo'\n");
//! ```

use std::fmt::{self, Display};
use std::io;

use num_traits::PrimInt;
use tracing::{debug, trace};

use crate::codec::Encode;
use crate::emitter::Emitter;
use crate::error::{Error, ErrorKind};
use crate::event::{Event, Scalar, ScalarStyle, TAG_BOOL, TAG_INT, TAG_STR};
use crate::options::EncoderOptions;

/// Destination of an encoder session.
pub enum Sink<'a> {
    /// YAML text accumulated in memory.
    String(String),
    /// YAML text written to a byte stream as it is produced.
    Writer(Box<dyn io::Write + 'a>),
    /// The raw event sequence, for replay.
    Events(Vec<Event>),
}

impl Sink<'_> {
    fn name(&self) -> &'static str {
        match self {
            Sink::String(_) => "string",
            Sink::Writer(_) => "writer",
            Sink::Events(_) => "events",
        }
    }
}

impl fmt::Debug for Sink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::String(s) => f.debug_tuple("String").field(s).finish(),
            Sink::Writer(_) => f.write_str("Writer(..)"),
            Sink::Events(events) => f.debug_tuple("Events").field(events).finish(),
        }
    }
}

/// `fmt::Write` that drops everything; lets the emitter check nesting for event sinks.
struct Discard;

impl fmt::Write for Discard {
    fn write_str(&mut self, _: &str) -> fmt::Result {
        Ok(())
    }
}

/// Encoder session bound to one [`Sink`].
///
/// The first failure is latched: it is returned by the failing call and by every later
/// emitting call.
#[derive(Debug)]
pub struct Encoder<'a> {
    sink: Sink<'a>,
    emitter: Emitter,
    /// Text of the event being written, reused across events for writer sinks.
    scratch: String,
    error: Option<Error>,
}

impl<'a> Encoder<'a> {
    fn with_sink(sink: Sink<'a>, options: EncoderOptions) -> Result<Self, Error> {
        options.validate()?;
        debug!(sink = sink.name(), "encoder opened");
        Ok(Encoder {
            sink,
            emitter: Emitter::new(options),
            scratch: String::new(),
            error: None,
        })
    }

    /// Encoder writing YAML text into an in-memory string.
    pub fn new_string() -> Self {
        Encoder {
            sink: Sink::String(String::new()),
            emitter: Emitter::new(EncoderOptions::default()),
            scratch: String::new(),
            error: None,
        }
    }

    pub fn new_string_with_options(options: EncoderOptions) -> Result<Self, Error> {
        Self::with_sink(Sink::String(String::new()), options)
    }

    /// Encoder writing YAML text to `writer`. Nothing is buffered beyond one event.
    pub fn new_writer<W: io::Write + 'a>(writer: W) -> Self {
        Encoder {
            sink: Sink::Writer(Box::new(writer)),
            emitter: Emitter::new(EncoderOptions::default()),
            scratch: String::new(),
            error: None,
        }
    }

    pub fn new_writer_with_options<W: io::Write + 'a>(
        writer: W,
        options: EncoderOptions,
    ) -> Result<Self, Error> {
        Self::with_sink(Sink::Writer(Box::new(writer)), options)
    }

    /// Encoder recording the event sequence instead of text.
    pub fn new_events() -> Self {
        Encoder {
            sink: Sink::Events(Vec::new()),
            emitter: Emitter::new(EncoderOptions::default()),
            scratch: String::new(),
            error: None,
        }
    }

    /// The sink this session writes to.
    pub fn sink(&self) -> &Sink<'a> {
        &self.sink
    }

    fn ensure_healthy(&self) -> Result<(), Error> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    #[cold]
    fn fail(&mut self, err: Error) -> Error {
        if self.error.is_none() {
            debug!(error = %err, "encoder error latched");
            self.error = Some(err.clone());
        }
        err
    }

    /// Forward one event to the sink.
    fn emit(&mut self, ev: Event) -> Result<(), Error> {
        self.ensure_healthy()?;
        trace!(event = %ev.kind(), "emit");
        let result = match &mut self.sink {
            Sink::String(buf) => self.emitter.emit(&ev, buf),
            Sink::Writer(writer) => {
                self.scratch.clear();
                self.emitter
                    .emit(&ev, &mut self.scratch)
                    .and_then(|()| writer.write_all(self.scratch.as_bytes()).map_err(Error::from))
            }
            Sink::Events(events) => self.emitter.emit(&ev, &mut Discard).map(|()| events.push(ev)),
        };
        result.map_err(|err| self.fail(err))
    }

    /// Begin the stream and its single document.
    pub fn start(&mut self) -> Result<(), Error> {
        self.emit(Event::StreamStart)?;
        self.emit(Event::DocumentStart)
    }

    /// Close the document and the stream. Writer sinks are flushed.
    pub fn end(&mut self) -> Result<(), Error> {
        self.emit(Event::DocumentEnd)?;
        self.emit(Event::StreamEnd)?;
        self.flush()
    }

    fn flush(&mut self) -> Result<(), Error> {
        if let Sink::Writer(writer) = &mut self.sink {
            if let Err(err) = writer.flush() {
                return Err(self.fail(Error::from(err)));
            }
        }
        Ok(())
    }

    pub fn map_start(&mut self) -> Result<(), Error> {
        self.emit(Event::MappingStart)
    }

    pub fn map_end(&mut self) -> Result<(), Error> {
        self.emit(Event::MappingEnd)
    }

    /// Emit a mapping key. Keys are written plain unless they need quoting.
    pub fn map_key(&mut self, key: &str) -> Result<(), Error> {
        self.emit(Event::Scalar(Scalar::plain(key)))
    }

    pub fn list_start(&mut self) -> Result<(), Error> {
        self.emit(Event::SequenceStart)
    }

    pub fn list_end(&mut self) -> Result<(), Error> {
        self.emit(Event::SequenceEnd)
    }

    /// Emit `true` or `false`, plain and tagged as a boolean.
    pub fn write_bool(&mut self, value: bool) -> Result<(), Error> {
        let text = if value { "true" } else { "false" };
        self.emit(Event::Scalar(Scalar::tagged(text, ScalarStyle::Plain, TAG_BOOL)))
    }

    /// Emit an integer in decimal, plain and tagged as an integer.
    pub fn write_int<T: PrimInt + Display>(&mut self, value: T) -> Result<(), Error> {
        self.emit(Event::Scalar(Scalar::tagged(
            value.to_string(),
            ScalarStyle::Plain,
            TAG_INT,
        )))
    }

    /// Emit a string, single-quoted (double-quoted when it needs escapes).
    pub fn write_string(&mut self, value: &str) -> Result<(), Error> {
        self.emit(Event::Scalar(Scalar::tagged(
            value,
            ScalarStyle::SingleQuoted,
            TAG_STR,
        )))
    }

    /// Emit any [`Encode`] value.
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        value.encode(self)
    }

    #[cold]
    fn wrong_sink(&mut self, wanted: &str) -> Error {
        let detail = format!("needs a {wanted} sink, this encoder has a {} sink", self.sink.name());
        self.fail(Error::with_detail(ErrorKind::WrongType, detail))
    }

    /// Text produced so far. Only string sinks have it; others fail with `WrongType`.
    pub fn borrow_output(&mut self) -> Result<&str, Error> {
        if !matches!(self.sink, Sink::String(_)) {
            return Err(self.wrong_sink("string"));
        }
        match &self.sink {
            Sink::String(buf) => Ok(buf.as_str()),
            _ => Err(Error::new(ErrorKind::WrongType)),
        }
    }

    /// Take the produced text, consuming the session.
    pub fn into_string(mut self) -> Result<String, Error> {
        match std::mem::replace(&mut self.sink, Sink::Events(Vec::new())) {
            Sink::String(buf) => Ok(buf),
            other => {
                self.sink = other;
                Err(self.wrong_sink("string"))
            }
        }
    }

    /// Take the recorded events, consuming the session.
    pub fn into_events(mut self) -> Result<Vec<Event>, Error> {
        match std::mem::replace(&mut self.sink, Sink::String(String::new())) {
            Sink::Events(events) => Ok(events),
            other => {
                self.sink = other;
                Err(self.wrong_sink("events"))
            }
        }
    }

    /// The first error this session hit, if any.
    pub fn last_error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Flush a writer sink and close the session.
    pub fn release(mut self) -> Result<(), Error> {
        self.flush()?;
        trace!(sink = self.sink.name(), "encoder released");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingWriter;

    impl io::Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn write_pair(enc: &mut Encoder<'_>) -> Result<(), Error> {
        enc.start()?;
        enc.map_start()?;
        enc.map_key("flag")?;
        enc.write_bool(false)?;
        enc.map_key("count")?;
        enc.write_int(-3i8)?;
        enc.map_end()?;
        enc.end()
    }

    #[test]
    fn string_sink_output() {
        let mut enc = Encoder::new_string();
        write_pair(&mut enc).expect("encode");
        assert_eq!(enc.borrow_output().expect("text"), "flag: false\ncount: -3\n");
        assert_eq!(enc.into_string().expect("text"), "flag: false\ncount: -3\n");
    }

    #[test]
    fn writer_sink_streams_bytes() {
        let mut bytes = Vec::new();
        {
            let mut enc = Encoder::new_writer(&mut bytes);
            write_pair(&mut enc).expect("encode");
            enc.release().expect("release");
        }
        assert_eq!(String::from_utf8(bytes).expect("utf8"), "flag: false\ncount: -3\n");
    }

    #[test]
    fn event_sink_records_tags() {
        let mut enc = Encoder::new_events();
        write_pair(&mut enc).expect("encode");
        let events = enc.into_events().expect("events");
        assert_eq!(events.len(), 10);
        assert_eq!(
            events[4],
            Event::Scalar(Scalar::tagged("false", ScalarStyle::Plain, TAG_BOOL))
        );
    }

    #[test]
    fn borrow_output_needs_string_sink() {
        let mut enc = Encoder::new_events();
        let err = enc.borrow_output().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongType);
        assert_eq!(enc.last_error().map(Error::kind), Some(ErrorKind::WrongType));
    }

    #[test]
    fn writer_failure_is_latched() {
        let mut enc = Encoder::new_writer(FailingWriter);
        enc.start().expect("nothing written yet");
        let err = enc.write_int(1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownError);
        assert!(err.detail().expect("detail").contains("disk full"));
        assert_eq!(enc.end(), Err(err));
    }

    #[test]
    fn bad_nesting_is_latched() {
        let mut enc = Encoder::new_string();
        enc.start().expect("start");
        let err = enc.map_end().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownError);
        assert!(enc.write_bool(true).is_err());
    }

    #[test]
    fn invalid_options_are_rejected() {
        let options = crate::encoder_options! { indent_step: 0 };
        let err = Encoder::new_string_with_options(options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOptions);
    }
}
