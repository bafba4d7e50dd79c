//! Pull-based decoder cursor.
//!
//! A [`Decoder`] owns an [`EventSource`] and keeps at most one event of lookahead: the
//! *pending* event, which is the next event the caller will consume. Every decode
//! operation inspects the pending event first and consumes only when it matches, so a
//! failed operation leaves the cursor where it was.
//!
//! Maps and lists are decoded through visitor closures. The decoder hands each entry's key
//! (or index) to the visitor together with the cursor itself; the visitor must decode or
//! skip exactly one value before returning.

use std::io::Read;
use std::num::ParseIntError;
use std::str::FromStr;

use num_traits::PrimInt;
use tracing::{debug, trace};

use crate::codec::Decode;
use crate::error::{Error, ErrorKind};
use crate::event::{Event, EventKind, Scalar};
use crate::location::Location;
use crate::options::DecoderOptions;
use crate::source::{EventSource, ReaderSource, StrSource};

/// Streaming decoder cursor over an [`EventSource`].
///
/// ```rust
/// use yaml_visit::Decoder;
///
/// let mut de = Decoder::from_str("name: demo\nretries: 3\n").unwrap();
/// let mut name = String::new();
/// let mut retries = 0;
/// de.decode_map(|de, key| {
///     match key {
///         "name" => name = de.decode_string()?,
///         "retries" => retries = de.decode_int()?,
///         _ => de.skip_value()?,
///     }
///     Ok::<(), yaml_visit::Error>(())
/// })
/// .unwrap();
/// assert_eq!((name.as_str(), retries), ("demo", 3));
/// ```
pub struct Decoder<S: EventSource> {
    source: S,
    /// The pending event, pulled from the source but not yet consumed.
    look: Option<(Event, Location)>,
    /// Location of the most recently consumed event.
    last_location: Location,
    /// First error hit by this cursor; once set, every operation fails with a clone of it.
    error: Option<Error>,
    depth: usize,
    max_depth: usize,
    /// Count of values fully consumed; container loops use it to spot visitors that
    /// returned without taking their value.
    consumed: u64,
}

/// Decoder over borrowed text.
pub type StrDecoder<'a> = Decoder<StrSource<'a>>;

/// Decoder over an `io::Read` stream.
pub type ReaderDecoder<'a> = Decoder<ReaderSource<'a>>;

impl<'a> Decoder<StrSource<'a>> {
    /// Open a decoder over in-memory text.
    pub fn from_str(input: &'a str) -> Result<Self, Error> {
        Self::from_str_with_options(input, DecoderOptions::default())
    }

    pub fn from_str_with_options(input: &'a str, options: DecoderOptions) -> Result<Self, Error> {
        Decoder::open(StrSource::from_str(input), options)
    }

    /// Open a decoder over a byte buffer of known length. The bytes must be UTF-8.
    pub fn from_slice(bytes: &'a [u8]) -> Result<Self, Error> {
        Self::from_slice_with_options(bytes, DecoderOptions::default())
    }

    pub fn from_slice_with_options(
        bytes: &'a [u8],
        options: DecoderOptions,
    ) -> Result<Self, Error> {
        let input = std::str::from_utf8(bytes).map_err(|err| {
            Error::with_detail(ErrorKind::UnknownError, format!("input is not UTF-8: {err}"))
        })?;
        Self::from_str_with_options(input, options)
    }
}

impl<'a> Decoder<ReaderSource<'a>> {
    /// Open a decoder over a byte stream (a file, a socket, stdin). UTF-16 input with a BOM
    /// is decoded transparently.
    pub fn from_reader<R: Read + 'a>(reader: R) -> Result<Self, Error> {
        Self::from_reader_with_options(reader, DecoderOptions::default())
    }

    pub fn from_reader_with_options<R: Read + 'a>(
        reader: R,
        options: DecoderOptions,
    ) -> Result<Self, Error> {
        Decoder::open(
            ReaderSource::from_reader(reader, options.max_reader_bytes),
            options,
        )
    }
}

impl<S: EventSource> Decoder<S> {
    /// Open a decoder over any event source.
    pub fn from_source(source: S) -> Result<Self, Error> {
        Self::from_source_with_options(source, DecoderOptions::default())
    }

    pub fn from_source_with_options(source: S, options: DecoderOptions) -> Result<Self, Error> {
        Decoder::open(source, options)
    }

    /// Pull past the stream and document envelopes and park the first content event (or
    /// the terminal event of an empty document) as pending.
    fn open(source: S, options: DecoderOptions) -> Result<Self, Error> {
        let mut de = Decoder {
            source,
            look: None,
            last_location: Location::UNKNOWN,
            error: None,
            depth: 0,
            max_depth: options.max_depth,
            consumed: 0,
        };
        loop {
            let Some((ev, location)) = de.source.next_event()? else {
                return Err(Error::with_detail(
                    ErrorKind::UnknownError,
                    "event source produced no events",
                ));
            };
            match ev.kind() {
                EventKind::StreamStart | EventKind::DocumentStart => {
                    de.last_location = location;
                }
                kind => {
                    debug!(first = %kind, line = location.line(), "decoder opened");
                    de.look = Some((ev, location));
                    return Ok(de);
                }
            }
        }
    }

    /// Fail fast if an error was latched earlier.
    fn ensure_healthy(&self) -> Result<(), Error> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Latch `err` if nothing is latched yet and hand it back for returning.
    #[cold]
    pub(crate) fn fail(&mut self, err: Error) -> Error {
        if self.error.is_none() {
            debug!(error = %err, "decoder error latched");
            self.error = Some(err.clone());
        }
        err
    }

    /// Kind and location of the pending event, pulling it from the source if needed.
    fn peek_pending(&mut self) -> Result<(EventKind, Location), Error> {
        if let Some((ev, location)) = &self.look {
            return Ok((ev.kind(), *location));
        }
        match self.source.next_event() {
            Ok(Some((ev, location))) => {
                let kind = ev.kind();
                self.look = Some((ev, location));
                Ok((kind, location))
            }
            Ok(None) => {
                let err = Error::with_detail(
                    ErrorKind::UnknownError,
                    "event source ended inside the document",
                )
                .at(self.last_location);
                Err(self.fail(err))
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn take_pending(&mut self) -> Option<(Event, Location)> {
        let pair = self.look.take();
        if let Some((_, location)) = &pair {
            self.last_location = *location;
        }
        pair
    }

    /// Text of the pending event when it is a scalar.
    fn pending_text(&self) -> &str {
        match &self.look {
            Some((Event::Scalar(s), _)) => &s.value,
            _ => "",
        }
    }

    /// Check that the pending event is a scalar; nothing is consumed.
    fn expect_scalar(&mut self, what: &str) -> Result<Location, Error> {
        self.ensure_healthy()?;
        let (kind, location) = self.peek_pending()?;
        if kind != EventKind::Scalar {
            return Err(self.fail(Error::unexpected(what, kind).at(location)));
        }
        Ok(location)
    }

    fn consume_scalar(&mut self) -> Result<Scalar, Error> {
        match self.take_pending() {
            Some((Event::Scalar(scalar), _)) => {
                self.consumed += 1;
                Ok(scalar)
            }
            _ => Err(self.fail(Error::with_detail(
                ErrorKind::UnknownError,
                "pending event vanished",
            ))),
        }
    }

    /// Consume a container start after checking its kind and the depth limit.
    fn begin_container(&mut self, start: EventKind, what: &str) -> Result<Location, Error> {
        self.ensure_healthy()?;
        let (kind, location) = self.peek_pending()?;
        if kind != start {
            return Err(self.fail(Error::unexpected(what, kind).at(location)));
        }
        if self.depth >= self.max_depth {
            let err = self.depth_exceeded(location);
            return Err(self.fail(err));
        }
        self.take_pending();
        self.depth += 1;
        Ok(location)
    }

    fn depth_exceeded(&self, location: Location) -> Error {
        Error::with_detail(
            ErrorKind::LimitExceeded,
            format!("nesting depth exceeds {}", self.max_depth),
        )
        .at(location)
    }

    fn end_container(&mut self) {
        self.take_pending();
        self.depth -= 1;
        self.consumed += 1;
    }

    /// A visitor failed or misbehaved. The resulting error names the entry and carries the
    /// message of whatever inner error the visitor ran into.
    #[cold]
    fn visitor_failed(&mut self, context: String, location: Location) -> Error {
        let detail = match &self.error {
            Some(inner) => format!("{context}: {inner}"),
            None => context,
        };
        let err = Error::with_detail(ErrorKind::CallbackSignaledError, detail).at(location);
        if self.error.is_none() {
            self.error = Some(err.clone());
        }
        debug!(error = %err, "visitor failed");
        err
    }

    /// Decode a block or flow mapping, calling `visit` once per entry with the entry's key.
    ///
    /// The visitor must consume exactly one value (decode it or [`skip_value`]) before
    /// returning `Ok`. Keys must be scalars. On a visitor error decoding stops and no further
    /// entries are visited. An empty mapping makes no calls.
    ///
    /// [`skip_value`]: Decoder::skip_value
    pub fn decode_map<F, E>(&mut self, mut visit: F) -> Result<(), Error>
    where
        F: FnMut(&mut Self, &str) -> Result<(), E>,
    {
        let start = self.begin_container(EventKind::MappingStart, "a mapping")?;
        trace!(line = start.line(), depth = self.depth, "mapping start");
        loop {
            let (kind, location) = self.peek_pending()?;
            match kind {
                EventKind::MappingEnd => {
                    self.end_container();
                    trace!(depth = self.depth, "mapping end");
                    return Ok(());
                }
                EventKind::Scalar => {
                    let key = self.take_key()?;
                    trace!(key = key.as_str(), "mapping entry");
                    let before = self.consumed;
                    if visit(self, &key).is_err() {
                        return Err(
                            self.visitor_failed(format!("visitor failed on key `{key}`"), location)
                        );
                    }
                    if self.error.is_some() {
                        return Err(self.visitor_failed(
                            format!("visitor for key `{key}` ignored an error"),
                            location,
                        ));
                    }
                    if self.consumed == before {
                        return Err(self.visitor_failed(
                            format!("visitor for key `{key}` did not consume a value"),
                            location,
                        ));
                    }
                }
                other => {
                    return Err(self.fail(
                        Error::unexpected("a scalar key or the end of the mapping", other)
                            .at(location),
                    ));
                }
            }
        }
    }

    /// Keys are consumed without counting as values.
    fn take_key(&mut self) -> Result<String, Error> {
        match self.take_pending() {
            Some((Event::Scalar(scalar), _)) => Ok(scalar.value),
            _ => Err(self.fail(Error::with_detail(
                ErrorKind::UnknownError,
                "pending event vanished",
            ))),
        }
    }

    /// Decode a sequence, calling `visit` once per element with its zero-based index.
    ///
    /// The same visitor contract as [`decode_map`](Decoder::decode_map) applies.
    pub fn decode_list<F, E>(&mut self, mut visit: F) -> Result<(), Error>
    where
        F: FnMut(&mut Self, usize) -> Result<(), E>,
    {
        let start = self.begin_container(EventKind::SequenceStart, "a sequence")?;
        trace!(line = start.line(), depth = self.depth, "sequence start");
        let mut index = 0usize;
        loop {
            let (kind, location) = self.peek_pending()?;
            if kind == EventKind::SequenceEnd {
                self.end_container();
                trace!(depth = self.depth, items = index, "sequence end");
                return Ok(());
            }
            if !kind.is_content() {
                return Err(self.fail(
                    Error::unexpected("an element or the end of the sequence", kind).at(location),
                ));
            }
            let before = self.consumed;
            if visit(self, index).is_err() {
                return Err(
                    self.visitor_failed(format!("visitor failed on element {index}"), location)
                );
            }
            if self.error.is_some() {
                return Err(self.visitor_failed(
                    format!("visitor for element {index} ignored an error"),
                    location,
                ));
            }
            if self.consumed == before {
                return Err(self.visitor_failed(
                    format!("visitor for element {index} did not consume a value"),
                    location,
                ));
            }
            index += 1;
        }
    }

    /// Decode a scalar that is exactly `true` or `false`.
    ///
    /// Other spellings (`True`, `yes`, `1`) fail with `InvalidBooleanToken`.
    pub fn decode_bool(&mut self) -> Result<bool, Error> {
        let location = self.expect_scalar("a boolean scalar")?;
        let parsed = match self.pending_text() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(format!("found `{other}`")),
        };
        match parsed {
            Ok(value) => {
                self.consume_scalar()?;
                Ok(value)
            }
            Err(detail) => {
                let err = Error::with_detail(ErrorKind::InvalidBooleanToken, detail).at(location);
                Err(self.fail(err))
            }
        }
    }

    /// Decode a scalar as a signed 64-bit integer. The whole text must be a decimal number.
    pub fn decode_int(&mut self) -> Result<i64, Error> {
        self.decode_int_as::<i64>()
    }

    /// Decode a scalar as any primitive integer type.
    ///
    /// Text that does not parse, or does not fit `T`, fails with `SystemError` carrying the
    /// conversion diagnostic.
    pub fn decode_int_as<T>(&mut self) -> Result<T, Error>
    where
        T: PrimInt + FromStr<Err = ParseIntError>,
    {
        let location = self.expect_scalar("an integer scalar")?;
        let parsed = self.pending_text().parse::<T>();
        match parsed {
            Ok(value) => {
                self.consume_scalar()?;
                Ok(value)
            }
            Err(parse) => {
                let detail = format!("`{}`: {parse}", self.pending_text());
                let err = Error::with_detail(ErrorKind::SystemError, detail).at(location);
                Err(self.fail(err))
            }
        }
    }

    /// Decode a scalar as a string. The returned `String` is owned by the caller.
    pub fn decode_string(&mut self) -> Result<String, Error> {
        self.expect_scalar("a string scalar")?;
        Ok(self.consume_scalar()?.value)
    }

    /// Decode the pending value into any [`Decode`] type.
    pub fn decode<T: Decode>(&mut self) -> Result<T, Error> {
        T::decode(self)
    }

    /// Consume and discard one value of any shape: a scalar or a whole nested container.
    pub fn skip_value(&mut self) -> Result<(), Error> {
        self.ensure_healthy()?;
        let (kind, location) = self.peek_pending()?;
        match kind {
            EventKind::Scalar => {
                self.consume_scalar()?;
                Ok(())
            }
            EventKind::MappingStart | EventKind::SequenceStart => {
                if self.depth >= self.max_depth {
                    let err = self.depth_exceeded(location);
                    return Err(self.fail(err));
                }
                self.take_pending();
                let mut nesting = 1usize;
                while nesting > 0 {
                    let (kind, location) = self.peek_pending()?;
                    match kind {
                        EventKind::MappingStart | EventKind::SequenceStart => {
                            if self.depth + nesting >= self.max_depth {
                                let err = self.depth_exceeded(location);
                                return Err(self.fail(err));
                            }
                            nesting += 1;
                        }
                        EventKind::MappingEnd | EventKind::SequenceEnd => nesting -= 1,
                        EventKind::Scalar => {}
                        other => {
                            return Err(self.fail(
                                Error::unexpected("the rest of a container", other).at(location),
                            ));
                        }
                    }
                    self.take_pending();
                }
                self.consumed += 1;
                trace!(line = location.line(), "skipped container");
                Ok(())
            }
            other => Err(self.fail(Error::unexpected("a value", other).at(location))),
        }
    }

    /// Kind of the pending event, without consuming it.
    pub fn peek_kind(&mut self) -> Result<EventKind, Error> {
        self.ensure_healthy()?;
        Ok(self.peek_pending()?.0)
    }

    /// True when the document holds no value at all (the pending event is a document or
    /// stream end).
    pub fn is_empty_document(&mut self) -> Result<bool, Error> {
        Ok(self.peek_kind()?.is_terminal())
    }

    /// Location of the pending event, or of the last consumed one if nothing is pending.
    pub fn location(&self) -> Location {
        match &self.look {
            Some((_, location)) => *location,
            None => self.last_location,
        }
    }

    /// The first error this cursor hit, if any.
    pub fn last_error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Message describing the latched error, or `"no error"`.
    pub fn describe_error(&self) -> String {
        match &self.error {
            Some(err) => err.to_string(),
            None => crate::error::describe(0).to_owned(),
        }
    }

    /// Verify that the document's root value was consumed completely and close the cursor.
    pub fn finish(mut self) -> Result<(), Error> {
        self.ensure_healthy()?;
        let (kind, location) = self.peek_pending()?;
        if !kind.is_terminal() {
            return Err(self.fail(Error::unexpected("the end of the document", kind).at(location)));
        }
        self.release();
        Ok(())
    }

    /// Release the cursor and its source without further checks.
    pub fn release(self) {
        trace!(consumed = self.consumed, "decoder released");
    }
}
