//! Event sources: the forward-only producers a [`Decoder`](crate::Decoder) pulls from.
//!
//! - [`ParserSource`] adapts `saphyr_parser::Parser` over in-memory text or a reader.
//! - [`ReplaySource`] serves events recorded earlier, for example by an encoder's
//!   event sink.
//!
//! Every event is produced exactly once. Once a source reports `Ok(None)` it stays
//! exhausted.

use std::collections::VecDeque;
use std::io::Read;

use saphyr_parser::{BorrowedInput, Parser, StrInput};

use crate::buffered_input::{IoErrorSlot, ReaderInput, buffered_input_from_reader_with_limit};
use crate::error::Error;
use crate::event::Event;
use crate::location::{Location, location_from_span};

/// Forward-only producer of structural events.
pub trait EventSource {
    /// Produce the next event with its location, `Ok(None)` when exhausted.
    fn next_event(&mut self) -> Result<Option<(Event, Location)>, Error>;
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    fn next_event(&mut self) -> Result<Option<(Event, Location)>, Error> {
        (**self).next_event()
    }
}

impl<S: EventSource + ?Sized> EventSource for Box<S> {
    fn next_event(&mut self) -> Result<Option<(Event, Location)>, Error> {
        (**self).next_event()
    }
}

/// Event source over `saphyr_parser::Parser`.
pub struct ParserSource<'input, T: BorrowedInput<'input>> {
    /// Underlying streaming parser that produces raw events from the input.
    parser: Parser<'input, T>,
    /// Read failure parked by reader-backed input, if any.
    io_error: Option<IoErrorSlot>,
    /// Set once the parser ran dry or failed; nothing is pulled afterwards.
    done: bool,
}

/// Parser source over borrowed text.
pub type StrSource<'input> = ParserSource<'input, StrInput<'input>>;

/// Parser source over an `io::Read` stream.
///
/// Buffered input hands out owned text only, so the parser lifetime is `'static`
/// while `'a` bounds the reader.
pub type ReaderSource<'a> = ParserSource<'static, ReaderInput<'a>>;

impl<'input> ParserSource<'input, StrInput<'input>> {
    /// Source over in-memory text.
    pub fn from_str(input: &'input str) -> Self {
        Self {
            parser: Parser::new_from_str(input),
            io_error: None,
            done: false,
        }
    }
}

impl<'a> ParserSource<'static, ReaderInput<'a>> {
    /// Source over a byte stream. UTF-16 input with a BOM is decoded transparently.
    /// `max_bytes` caps the decoded size; exceeding it is reported as `LimitExceeded`.
    pub fn from_reader<R: Read + 'a>(reader: R, max_bytes: Option<usize>) -> Self {
        let (input, io_error) = buffered_input_from_reader_with_limit(reader, max_bytes);
        Self {
            parser: Parser::new(input),
            io_error: Some(io_error),
            done: false,
        }
    }
}

impl<'input, T: BorrowedInput<'input>> ParserSource<'input, T> {
    /// A reader failure looks like EOF to the parser; surface it here instead.
    fn take_io_error(&mut self, location: Location) -> Result<(), Error> {
        if let Some(slot) = &self.io_error {
            if let Some(err) = slot.borrow_mut().take() {
                self.done = true;
                return Err(Error::from_io(&err).at(location));
            }
        }
        Ok(())
    }
}

impl<'input, T: BorrowedInput<'input>> EventSource for ParserSource<'input, T> {
    fn next_event(&mut self) -> Result<Option<(Event, Location)>, Error> {
        if self.done {
            return Ok(None);
        }
        while let Some(item) = self.parser.next() {
            let (raw, span) = match item {
                Ok(pair) => pair,
                Err(scan) => {
                    self.take_io_error(Location::UNKNOWN)?;
                    self.done = true;
                    return Err(Error::from_scan_error(scan));
                }
            };
            let location = location_from_span(&span);
            self.take_io_error(location)?;
            match Event::from_parser(raw) {
                Ok(Some(ev)) => return Ok(Some((ev, location))),
                Ok(None) => continue,
                Err(err) => {
                    self.done = true;
                    return Err(err.at(location));
                }
            }
        }
        self.take_io_error(Location::UNKNOWN)?;
        self.done = true;
        Ok(None)
    }
}

/// Event source serving a pre-recorded sequence of events.
///
/// Replayed events carry [`Location::UNKNOWN`].
#[derive(Clone, Debug, Default)]
pub struct ReplaySource {
    events: VecDeque<Event>,
}

impl ReplaySource {
    pub fn new<I: IntoIterator<Item = Event>>(events: I) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Number of events not yet served.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl EventSource for ReplaySource {
    fn next_event(&mut self) -> Result<Option<(Event, Location)>, Error> {
        Ok(self.events.pop_front().map(|ev| (ev, Location::UNKNOWN)))
    }
}
