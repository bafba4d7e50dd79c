#![no_main]

use libfuzzer_sys::fuzz_target;
use yaml_visit::{Decoder, Error, EventKind, EventSource};

/// Walk any document, decoding scalars as strings.
fn walk<S: EventSource>(de: &mut Decoder<S>) -> Result<(), Error> {
    match de.peek_kind()? {
        EventKind::MappingStart => de.decode_map(|de, _| walk(de)),
        EventKind::SequenceStart => de.decode_list(|de, _| walk(de)),
        EventKind::Scalar => de.decode_string().map(|_| ()),
        _ => Ok(()),
    }
}

// Neither entry point may panic, whatever the bytes.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }

    let _ = Decoder::from_slice(data).and_then(|mut de| walk(&mut de));
    let _ = Decoder::from_reader(data).and_then(|mut de| walk(&mut de));
});
