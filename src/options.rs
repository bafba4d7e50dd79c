//! Decoder and encoder configuration.
//!
//! Both option structs derive `serde` traits so they can live inside an application's own
//! configuration file. Construct them with [`decoder_options!`](crate::decoder_options!) and
//! [`encoder_options!`](crate::encoder_options!) to stay compatible when fields are added.

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind};

/// Default nesting depth accepted by the decoder.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Decoder configuration.
///
/// ```rust
/// let options = yaml_visit::decoder_options! {
///     max_depth: 8,
/// };
/// let mut de = yaml_visit::Decoder::from_str_with_options("[[1]]", options).unwrap();
/// let mut total = 0;
/// de.decode_list(|de, _| {
///     de.decode_list(|de, _| {
///         total += de.decode_int()?;
///         Ok::<(), yaml_visit::Error>(())
///     })
/// })
/// .unwrap();
/// assert_eq!(total, 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// Maximum nesting of maps and lists. Deeper documents fail with `LimitExceeded`.
    pub max_depth: usize,
    /// Optional cap on decoded input bytes, applied when decoding from a reader.
    pub max_reader_bytes: Option<usize>,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_reader_bytes: None,
        }
    }
}

/// Encoder (text emitter) configuration.
///
/// ```rust
/// use yaml_visit::Encoder;
///
/// let options = yaml_visit::encoder_options! {
///     version_directive: true,
/// };
/// let mut enc = Encoder::new_string_with_options(options).unwrap();
/// enc.start().unwrap();
/// enc.write_int(7).unwrap();
/// enc.end().unwrap();
/// assert_eq!(enc.borrow_output().unwrap(), "%YAML 1.1\n---\n7\n");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Spaces per nesting level of block mappings.
    pub indent_step: usize,
    /// If true, sequences under a mapping key are indented by `indent_step`; otherwise the
    /// dashes line up with the key (`key:\n- a`).
    pub indent_sequences: bool,
    /// Emit `%YAML 1.1` before the document (implies an explicit `---`).
    pub version_directive: bool,
    /// Emit `---` before the document even without a directive.
    pub explicit_document_start: bool,
    /// Emit `...` after the document.
    pub explicit_document_end: bool,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            indent_step: 2,
            indent_sequences: false,
            version_directive: false,
            explicit_document_start: false,
            explicit_document_end: false,
        }
    }
}

impl EncoderOptions {
    /// Reject settings that would produce ambiguous YAML.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.indent_step == 0 {
            return Err(Error::with_detail(
                ErrorKind::InvalidOptions,
                "indent_step must be at least 1",
            ));
        }
        Ok(())
    }
}
