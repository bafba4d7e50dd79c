//! Error kinds, the error value latched by decoders and encoders, and message lookup.
use std::fmt;
use std::io;

use saphyr_parser::ScanError;
use serde::{Deserialize, Serialize};

use crate::event::EventKind;
use crate::location::Location;

/// Text returned by [`describe`] for codes outside the known range.
pub const NO_DESCRIPTION: &str = "no description available";

/// Broad classification of everything that can go wrong while decoding or encoding.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The event source or sink reported a low-level failure (tokenizer, emitter, I/O).
    UnknownError,
    /// The host environment refused a value conversion (for example, integer parsing).
    SystemError,
    /// The structural kind of the pending event does not match what the operation requires.
    UnexpectedEvent,
    /// A scalar was decoded as a boolean but is neither `true` nor `false`.
    InvalidBooleanToken,
    /// A visitor returned failure, or returned without consuming its entry value.
    CallbackSignaledError,
    /// The operation needs a different sink kind than the one the session was opened with.
    WrongType,
    /// A configured nesting or input-size limit was exceeded.
    LimitExceeded,
    /// Options used would produce invalid YAML (zero indentation, etc).
    InvalidOptions,
}

impl ErrorKind {
    /// Every kind, in code order.
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::UnknownError,
        ErrorKind::SystemError,
        ErrorKind::WrongType,
        ErrorKind::UnexpectedEvent,
        ErrorKind::InvalidBooleanToken,
        ErrorKind::CallbackSignaledError,
        ErrorKind::LimitExceeded,
        ErrorKind::InvalidOptions,
    ];

    /// Human-readable description of the kind.
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::UnknownError => "the YAML event source or sink reported an error",
            ErrorKind::SystemError => "a system error occurred while converting a value",
            ErrorKind::UnexpectedEvent => "encountered an unexpected YAML event",
            ErrorKind::InvalidBooleanToken => "boolean must be exactly `true` or `false`",
            ErrorKind::CallbackSignaledError => "a visitor callback signaled an error",
            ErrorKind::WrongType => "serializer is the wrong type for the operation",
            ErrorKind::LimitExceeded => "a configured limit was exceeded",
            ErrorKind::InvalidOptions => "invalid encoder options",
        }
    }

    /// Stable numeric code of the kind; `0` is reserved for "no error".
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::UnknownError => 1,
            ErrorKind::SystemError => 2,
            ErrorKind::WrongType => 3,
            ErrorKind::UnexpectedEvent => 4,
            ErrorKind::InvalidBooleanToken => 5,
            ErrorKind::CallbackSignaledError => 6,
            ErrorKind::LimitExceeded => 7,
            ErrorKind::InvalidOptions => 8,
        }
    }

    /// Inverse of [`ErrorKind::code`].
    pub fn from_code(code: i32) -> Option<ErrorKind> {
        ErrorKind::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Map a numeric error code to its description.
///
/// `0` means "no error"; codes outside the known range yield [`NO_DESCRIPTION`].
pub fn describe(code: i32) -> &'static str {
    if code == 0 {
        return "no error";
    }
    match ErrorKind::from_code(code) {
        Some(kind) => kind.message(),
        None => NO_DESCRIPTION,
    }
}

/// Error returned by every decoder and encoder operation.
///
/// The first error a [`Decoder`](crate::Decoder) or [`Encoder`](crate::Encoder) hits is
/// latched; subsequent calls on the same instance return a clone of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    detail: Option<String>,
    location: Location,
}

impl Error {
    /// Construct an error of the given kind without details.
    pub fn new(kind: ErrorKind) -> Self {
        Error {
            kind,
            detail: None,
            location: Location::UNKNOWN,
        }
    }

    /// Construct an error of the given kind with an underlying diagnostic.
    pub fn with_detail<S: Into<String>>(kind: ErrorKind, detail: S) -> Self {
        Error {
            kind,
            detail: Some(detail.into()),
            location: Location::UNKNOWN,
        }
    }

    #[cold]
    pub(crate) fn unexpected(expected: &str, found: EventKind) -> Self {
        Error::with_detail(
            ErrorKind::UnexpectedEvent,
            format!("expected {expected}, found {found}"),
        )
    }

    /// Attach a location unless one is already recorded.
    pub(crate) fn at(mut self, location: Location) -> Self {
        if !self.location.is_known() {
            self.location = location;
        }
        self
    }

    /// Map a `saphyr_parser::ScanError` into an `UnknownError` with location.
    pub(crate) fn from_scan_error(err: ScanError) -> Self {
        let mark = err.marker();
        let location = Location::new(mark.line(), mark.col() + 1);
        Error::with_detail(ErrorKind::UnknownError, err.info().to_owned()).at(location)
    }

    /// Map an I/O failure of the underlying stream.
    pub(crate) fn from_io(err: &io::Error) -> Self {
        let kind = if err.kind() == io::ErrorKind::FileTooLarge {
            ErrorKind::LimitExceeded
        } else {
            ErrorKind::UnknownError
        };
        Error::with_detail(kind, format!("I/O error: {err}"))
    }

    /// Kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Underlying diagnostic (parser message, `ParseIntError` text, I/O error text, ...).
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Where in the input the error was detected, if known.
    pub fn location(&self) -> Option<Location> {
        if self.location.is_known() {
            Some(self.location)
        } else {
            None
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.message())?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        if self.location.is_known() {
            write!(
                f,
                " at line {}, column {}",
                self.location.line, self.location.column
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl From<fmt::Error> for Error {
    fn from(error: fmt::Error) -> Self {
        Error::with_detail(ErrorKind::UnknownError, format!("formatting error: {error}"))
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::from_io(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_kinds() {
        for kind in ErrorKind::ALL {
            assert_eq!(ErrorKind::from_code(kind.code()), Some(kind));
            assert_eq!(describe(kind.code()), kind.message());
        }
    }

    #[test]
    fn out_of_range_codes_have_no_description() {
        assert_eq!(describe(0), "no error");
        assert_eq!(describe(-3), NO_DESCRIPTION);
        assert_eq!(describe(42), NO_DESCRIPTION);
    }

    #[test]
    fn display_includes_detail_and_location() {
        let err = Error::with_detail(ErrorKind::SystemError, "invalid digit found in string")
            .at(Location::new(2, 11));
        assert_eq!(
            err.to_string(),
            "a system error occurred while converting a value: invalid digit found in string at line 2, column 11"
        );
    }

    #[test]
    fn first_location_wins() {
        let err = Error::new(ErrorKind::UnexpectedEvent)
            .at(Location::new(1, 1))
            .at(Location::new(5, 5));
        assert_eq!(err.location(), Some(Location::new(1, 1)));
    }

    #[test]
    fn file_too_large_maps_to_limit() {
        let io = std::io::Error::new(std::io::ErrorKind::FileTooLarge, "too big");
        assert_eq!(Error::from_io(&io).kind(), ErrorKind::LimitExceeded);
        let io = std::io::Error::other("boom");
        assert_eq!(Error::from(io).kind(), ErrorKind::UnknownError);
    }
}
