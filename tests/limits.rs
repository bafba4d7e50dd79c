use std::io::Cursor;
use yaml_visit::{Decoder, DecoderOptions, Error, ErrorKind};

fn nested_lists(depth: usize) -> String {
    format!("{}1{}", "[".repeat(depth), "]".repeat(depth))
}

#[test]
fn default_depth_limit_stops_deep_nesting() {
    let yaml = nested_lists(yaml_visit::DEFAULT_MAX_DEPTH + 10);
    let mut de = Decoder::from_str(&yaml).expect("open");
    let err = de.skip_value().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LimitExceeded);
}

#[test]
fn depth_within_limit_is_fine() {
    let yaml = nested_lists(yaml_visit::DEFAULT_MAX_DEPTH);
    let mut de = Decoder::from_str(&yaml).expect("open");
    de.skip_value().expect("skip");
    de.finish().expect("finish");
}

#[test]
fn configured_depth_limit_applies_to_visitors() {
    fn dive<S: yaml_visit::EventSource>(de: &mut Decoder<S>) -> Result<(), Error> {
        if de.peek_kind()? == yaml_visit::EventKind::Scalar {
            return de.skip_value();
        }
        de.decode_list(|de, _| dive(de))
    }

    let options = yaml_visit::decoder_options! { max_depth: 3 };
    let shallow = nested_lists(3);
    let mut de = Decoder::from_str_with_options(&shallow, options).expect("open");
    dive(&mut de).expect("three levels");

    let deep = nested_lists(4);
    let mut de = Decoder::from_str_with_options(&deep, options).expect("open");
    assert!(dive(&mut de).is_err());
    assert_eq!(
        de.last_error().map(Error::kind),
        Some(ErrorKind::LimitExceeded)
    );
}

#[test]
fn reader_byte_cap() {
    let yaml = format!("[{}]", vec!["12345"; 2000].join(", "));
    let options = DecoderOptions {
        max_reader_bytes: Some(64),
        ..DecoderOptions::default()
    };
    let outcome = Decoder::from_reader_with_options(Cursor::new(yaml.into_bytes()), options)
        .and_then(|mut de| {
            de.skip_value()
                .map_err(|err| de.last_error().cloned().unwrap_or(err))
        });
    assert_eq!(outcome.unwrap_err().kind(), ErrorKind::LimitExceeded);
}
