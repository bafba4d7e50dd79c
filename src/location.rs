//! Source positions attached to events and errors.

use saphyr_parser::Span as ParserSpan;
use serde::{Deserialize, Serialize};

/// Row/column location within the source YAML document (1-indexed).
///
/// Events that did not come from text (for example, events replayed from an
/// encoder's event sink) carry [`Location::UNKNOWN`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// 1-indexed row number in the input stream.
    pub(crate) line: u32,
    /// 1-indexed column number in the input stream.
    pub(crate) column: u32,
}

impl Location {
    /// Sentinel value meaning "location unknown".
    pub const UNKNOWN: Self = Self { line: 0, column: 0 };

    /// Create a new location record from 1-indexed coordinates.
    pub(crate) const fn new(line: usize, column: usize) -> Self {
        // 4 Gb is larger than any YAML document we can decode in practice, and this
        // is diagnostics only.
        Self {
            line: line as u32,
            column: column as u32,
        }
    }

    /// 1-indexed line, or 0 when unknown.
    pub fn line(&self) -> u64 {
        self.line as u64
    }

    /// 1-indexed column, or 0 when unknown.
    pub fn column(&self) -> u64 {
        self.column as u64
    }

    /// True when both coordinates were recorded.
    pub fn is_known(&self) -> bool {
        self.line != 0 && self.column != 0
    }
}

/// Convert a `saphyr_parser::Span` to a 1-indexed [`Location`].
///
/// The parser reports 1-based lines and 0-based columns.
pub(crate) fn location_from_span(span: &ParserSpan) -> Location {
    let start = &span.start;
    Location::new(start.line(), start.col() + 1)
}
