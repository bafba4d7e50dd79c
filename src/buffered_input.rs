//! Streaming, chunked character input helpers.
//!
//! Turns any `std::io::Read` into a streaming iterator of UTF-8 `char`s so a decoder can
//! consume a file or socket without loading it whole. `encoding_rs_io` sniffs the BOM and
//! decodes UTF-16 inputs to UTF-8 on the fly.

use encoding_rs_io::DecodeReaderBytesBuilder;
use saphyr_parser::BufferedInput;
use std::cell::RefCell;
use std::io::{self, BufReader, Error, Read};
use std::rc::Rc;

/// Shared slot where a reader failure is parked until the event source asks for it.
pub(crate) type IoErrorSlot = Rc<RefCell<Option<Error>>>;

/// Character input over a boxed reader, as handed to `saphyr_parser::Parser::new`.
pub type ReaderInput<'a> = BufferedInput<ChunkedChars<BufReader<Box<dyn Read + 'a>>>>;

/// IO error replacement char
const IO_ERROR_CHAR: char = '\u{FFFD}';

pub struct ChunkedChars<R: Read> {
    /// Optional hard cap on total decoded UTF-8 bytes yielded by this iterator.
    max_bytes: Option<usize>,
    /// Running count of decoded bytes read so far.
    total_bytes: usize,
    /// Reader that already yields UTF-8 bytes.
    reader: R,
    /// Currently available decoded slice that hasn't been fully iterated yet.
    buf: String,
    /// Byte index into `buf` of the next character to return.
    idx: usize,
    /// Reusable byte buffer for the next chunk.
    tmp: Vec<u8>,
    /// Parser API gives us no way back to this iterator, so errors are shared out.
    err: IoErrorSlot,
}

impl<R: Read> ChunkedChars<R> {
    fn new(reader: R, max_bytes: Option<usize>, err: IoErrorSlot) -> Self {
        Self {
            max_bytes,
            total_bytes: 0,
            reader,
            buf: String::new(),
            idx: 0,
            tmp: vec![0u8; 8 * 1024],
            err,
        }
    }

    /// Refill `buf` with the next chunk of decoded UTF-8.
    ///
    /// Returns `Ok(true)` when new data was loaded, `Ok(false)` on EOF.
    fn refill(&mut self) -> io::Result<bool> {
        let mut spin_guards = 0;
        loop {
            let n = self.reader.read(&mut self.tmp)?;
            if n == 0 {
                return Ok(false);
            }
            // A chunk boundary may split a multi-byte char; keep the incomplete tail for later.
            let (valid, rest) = match std::str::from_utf8(&self.tmp[..n]) {
                Ok(s) => (s.len(), 0),
                Err(e) if e.error_len().is_none() => (e.valid_up_to(), n - e.valid_up_to()),
                Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e)),
            };
            if rest > 0 {
                let mut tail = self.tmp[valid..n].to_vec();
                let mut more = [0u8; 4];
                while std::str::from_utf8(&tail).is_err() && tail.len() < 4 {
                    let m = self.reader.read(&mut more[..1])?;
                    if m == 0 {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidData,
                            "stream ends inside a UTF-8 sequence",
                        ));
                    }
                    tail.push(more[0]);
                }
                let tail = String::from_utf8(tail)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                let head = std::str::from_utf8(&self.tmp[..valid])
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                self.buf.clear();
                self.buf.push_str(head);
                self.buf.push_str(&tail);
            } else {
                let s = std::str::from_utf8(&self.tmp[..valid])
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                self.buf.clear();
                self.buf.push_str(s);
            }
            if !self.buf.is_empty() {
                if let Some(limit) = self.max_bytes {
                    self.total_bytes = self.total_bytes.saturating_add(self.buf.len());
                    if self.total_bytes > limit {
                        return Err(io::Error::new(
                            io::ErrorKind::FileTooLarge,
                            format!("input size limit of {limit} bytes exceeded"),
                        ));
                    }
                }
                self.idx = 0;
                return Ok(true);
            }
            spin_guards += 1;
            if spin_guards > 128 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "read keeps returning empty chunks without EOF",
                ));
            }
        }
    }
}

impl<R: Read> Iterator for ChunkedChars<R> {
    type Item = char;

    /// Returns the next char, or `None` on EOF. On a read failure the error is parked in the
    /// shared slot and EOF is reported; the event source checks the slot afterwards.
    fn next(&mut self) -> Option<char> {
        loop {
            if self.idx < self.buf.len() {
                let ch = self.buf[self.idx..].chars().next().unwrap_or(IO_ERROR_CHAR);
                self.idx += ch.len_utf8();
                return Some(ch);
            }
            match self.refill() {
                Ok(true) => continue,
                Ok(false) => return None,
                Err(error) => {
                    self.err.replace(Some(error));
                    return None;
                }
            }
        }
    }
}

/// Creates buffered parser input from a reader, plus the slot that will hold a read error.
pub(crate) fn buffered_input_from_reader_with_limit<'a, R: Read + 'a>(
    reader: R,
    max_bytes: Option<usize>,
) -> (ReaderInput<'a>, IoErrorSlot) {
    // Sniff BOM / guess, decode to UTF-8 on the fly.
    let decoder = DecodeReaderBytesBuilder::new().encoding(None).build(reader);

    let error: IoErrorSlot = Rc::new(RefCell::new(None));

    let br = BufReader::new(Box::new(decoder) as Box<dyn Read + 'a>);
    let char_iter = ChunkedChars::new(br, max_bytes, error.clone());

    (BufferedInput::new(char_iter), error)
}
