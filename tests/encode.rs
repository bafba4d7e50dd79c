//! Encoder sessions over the three sink kinds.

use indoc::indoc;
use std::io;
use yaml_visit::{Encoder, ErrorKind, Event, Sink};

fn write_record(enc: &mut Encoder<'_>) -> Result<(), yaml_visit::Error> {
    enc.start()?;
    enc.map_start()?;
    enc.map_key("test")?;
    enc.write_bool(true)?;
    enc.map_key("a_number")?;
    enc.write_int(1)?;
    enc.map_key("a_string")?;
    enc.write_string("test")?;
    enc.map_key("list_of_four")?;
    enc.list_start()?;
    for value in 1..=4 {
        enc.write_int(value)?;
    }
    enc.list_end()?;
    enc.map_end()?;
    enc.end()
}

#[test]
fn string_sink_with_version_directive() -> anyhow::Result<()> {
    let options = yaml_visit::encoder_options! { version_directive: true };
    let mut enc = Encoder::new_string_with_options(options)?;
    write_record(&mut enc)?;
    assert_eq!(
        enc.borrow_output()?,
        indoc! {"
            %YAML 1.1
            ---
            test: true
            a_number: 1
            a_string: 'test'
            list_of_four:
            - 1
            - 2
            - 3
            - 4
        "}
    );
    Ok(())
}

#[test]
fn writer_sink_gets_the_same_text() -> anyhow::Result<()> {
    let mut text = Encoder::new_string();
    write_record(&mut text)?;

    let mut bytes = Vec::new();
    let mut enc = Encoder::new_writer(&mut bytes);
    write_record(&mut enc)?;
    enc.release()?;

    assert_eq!(String::from_utf8(bytes)?, text.into_string()?);
    Ok(())
}

#[test]
fn writer_sink_to_file() -> anyhow::Result<()> {
    let file = tempfile::NamedTempFile::new()?;
    let mut enc = Encoder::new_writer(io::BufWriter::new(file.reopen()?));
    write_record(&mut enc)?;
    enc.release()?;

    let written = std::fs::read_to_string(file.path())?;
    assert!(written.starts_with("test: true\n"));
    assert!(written.ends_with("- 4\n"));
    Ok(())
}

#[test]
fn borrow_output_requires_string_sink() {
    let mut enc = Encoder::new_events();
    assert!(matches!(enc.sink(), Sink::Events(_)));
    assert_eq!(enc.borrow_output().unwrap_err().kind(), ErrorKind::WrongType);

    let mut enc = Encoder::new_writer(io::sink());
    assert_eq!(enc.borrow_output().unwrap_err().kind(), ErrorKind::WrongType);

    let enc = Encoder::new_string();
    assert_eq!(enc.into_events().unwrap_err().kind(), ErrorKind::WrongType);
}

#[test]
fn event_sink_records_the_call_sequence() -> anyhow::Result<()> {
    let mut enc = Encoder::new_events();
    enc.start()?;
    enc.list_start()?;
    enc.write_string("x")?;
    enc.list_end()?;
    enc.end()?;
    let kinds: Vec<_> = enc.into_events()?.iter().map(Event::kind).collect();
    use yaml_visit::EventKind::*;
    assert_eq!(
        kinds,
        vec![
            StreamStart,
            DocumentStart,
            SequenceStart,
            Scalar,
            SequenceEnd,
            DocumentEnd,
            StreamEnd
        ]
    );
    Ok(())
}

struct BrokenPipe;

impl io::Write for BrokenPipe {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn sink_failure_is_latched() {
    let mut enc = Encoder::new_writer(BrokenPipe);
    let err = write_record(&mut enc).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownError);
    assert_eq!(enc.last_error(), Some(&err));
    assert_eq!(enc.map_start(), Err(err));
}

#[test]
fn protocol_violation_is_unknown_error() {
    let mut enc = Encoder::new_string();
    enc.start().expect("start");
    enc.map_start().expect("map");
    let err = enc.list_start().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownError);
}

#[test]
fn strings_needing_escapes() -> anyhow::Result<()> {
    let mut enc = Encoder::new_string();
    enc.start()?;
    enc.map_start()?;
    enc.map_key("quote")?;
    enc.write_string("it's")?;
    enc.map_key("multi")?;
    enc.write_string("a\nb")?;
    enc.map_key("looks like a number")?;
    enc.write_string("42")?;
    enc.map_end()?;
    enc.end()?;
    assert_eq!(
        enc.borrow_output()?,
        "quote: 'it''s'\nmulti: \"a\\nb\"\nlooks like a number: '42'\n"
    );
    Ok(())
}

#[test]
fn integer_widths() -> anyhow::Result<()> {
    let mut enc = Encoder::new_string();
    enc.start()?;
    enc.list_start()?;
    enc.write_int(u64::MAX)?;
    enc.write_int(i8::MIN)?;
    enc.write_int(0usize)?;
    enc.list_end()?;
    enc.end()?;
    assert_eq!(enc.borrow_output()?, "- 18446744073709551615\n- -128\n- 0\n");
    Ok(())
}

#[test]
fn explicit_document_markers() -> anyhow::Result<()> {
    let options = yaml_visit::encoder_options! {
        explicit_document_start: true,
        explicit_document_end: true,
    };
    let text = yaml_visit::to_string_with_options(&vec![true, false], options)?;
    assert_eq!(text, "---\n- true\n- false\n...\n");
    Ok(())
}
