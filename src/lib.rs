//! Streaming YAML traversal without a document tree.
//!
//! Decoding is pull-based: a [`Decoder`] holds one pending event from its
//! [`EventSource`] and application code walks the document with visitor closures
//! ([`Decoder::decode_map`], [`Decoder::decode_list`]) and scalar readers
//! ([`Decoder::decode_bool`], [`Decoder::decode_int`], [`Decoder::decode_string`]).
//!
//! Encoding is push-based: an [`Encoder`] turns calls such as [`Encoder::map_start`] and
//! [`Encoder::write_int`] into events and writes them to its [`Sink`].
//!
//! ```rust
//! use yaml_visit::{Decoder, Encoder, Error};
//!
//! let yaml = "test: true\na_number: 1\nlist:\n  - 1\n  - 2\n";
//! let mut de = Decoder::from_str(yaml).unwrap();
//! let (mut flag, mut number, mut list) = (false, 0, Vec::new());
//! de.decode_map(|de, key| {
//!     match key {
//!         "test" => flag = de.decode_bool()?,
//!         "a_number" => number = de.decode_int()?,
//!         "list" => de.decode_list(|de, _| {
//!             list.push(de.decode_int()?);
//!             Ok::<(), Error>(())
//!         })?,
//!         _ => de.skip_value()?,
//!     }
//!     Ok::<(), Error>(())
//! })
//! .unwrap();
//! assert!(flag);
//! assert_eq!((number, list), (1, vec![1, 2]));
//!
//! let mut enc = Encoder::new_string();
//! enc.start().unwrap();
//! enc.map_start().unwrap();
//! enc.map_key("test").unwrap();
//! enc.write_bool(true).unwrap();
//! enc.map_end().unwrap();
//! enc.end().unwrap();
//! assert_eq!(enc.borrow_output().unwrap(), "test: true\n");
//! ```

use std::io;

mod buffered_input;
mod codec;
mod de;
mod emitter;
mod error;
mod event;
mod location;
mod macros;
mod options;
mod ser;
mod ser_quoting;
mod source;

pub use codec::{Decode, Encode};
pub use de::{Decoder, ReaderDecoder, StrDecoder};
pub use error::{Error, ErrorKind, NO_DESCRIPTION, describe};
pub use event::{Event, EventKind, Scalar, ScalarStyle, TAG_BOOL, TAG_INT, TAG_STR};
pub use location::Location;
pub use options::{DEFAULT_MAX_DEPTH, DecoderOptions, EncoderOptions};
pub use ser::{Encoder, Sink};
pub use source::{EventSource, ParserSource, ReaderSource, ReplaySource, StrSource};

/// Decode a whole document from text into `T`.
///
/// The root value must be the only content of the document.
pub fn from_str<T: Decode>(input: &str) -> Result<T, Error> {
    from_str_with_options(input, DecoderOptions::default())
}

pub fn from_str_with_options<T: Decode>(input: &str, options: DecoderOptions) -> Result<T, Error> {
    let mut de = Decoder::from_str_with_options(input, options)?;
    let value = T::decode(&mut de)?;
    de.finish()?;
    Ok(value)
}

/// Decode a whole document from a byte stream into `T`.
pub fn from_reader<R: io::Read, T: Decode>(reader: R) -> Result<T, Error> {
    from_reader_with_options(reader, DecoderOptions::default())
}

pub fn from_reader_with_options<R: io::Read, T: Decode>(
    reader: R,
    options: DecoderOptions,
) -> Result<T, Error> {
    let mut de = Decoder::from_reader_with_options(reader, options)?;
    let value = T::decode(&mut de)?;
    de.finish()?;
    Ok(value)
}

/// Encode `value` as a single YAML document.
pub fn to_string<T: Encode + ?Sized>(value: &T) -> Result<String, Error> {
    to_string_with_options(value, EncoderOptions::default())
}

pub fn to_string_with_options<T: Encode + ?Sized>(
    value: &T,
    options: EncoderOptions,
) -> Result<String, Error> {
    let mut enc = Encoder::new_string_with_options(options)?;
    enc.start()?;
    value.encode(&mut enc)?;
    enc.end()?;
    enc.into_string()
}

/// Encode `value` as a single YAML document into `writer`.
pub fn to_writer<W: io::Write, T: Encode + ?Sized>(writer: W, value: &T) -> Result<(), Error> {
    to_writer_with_options(writer, value, EncoderOptions::default())
}

pub fn to_writer_with_options<W: io::Write, T: Encode + ?Sized>(
    writer: W,
    value: &T,
    options: EncoderOptions,
) -> Result<(), Error> {
    let mut enc = Encoder::new_writer_with_options(writer, options)?;
    enc.start()?;
    value.encode(&mut enc)?;
    enc.end()?;
    enc.release()
}
