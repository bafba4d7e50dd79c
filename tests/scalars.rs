use yaml_visit::{Decoder, ErrorKind};

fn decode_bool(text: &str) -> Result<bool, yaml_visit::Error> {
    Decoder::from_str(text)?.decode_bool()
}

fn decode_int(text: &str) -> Result<i64, yaml_visit::Error> {
    Decoder::from_str(text)?.decode_int()
}

#[test]
fn booleans_are_strict() {
    assert_eq!(decode_bool("true"), Ok(true));
    assert_eq!(decode_bool("false"), Ok(false));
    for text in ["0", "1", "True", "FALSE", "yes", "on", "'maybe'"] {
        let err = decode_bool(text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBooleanToken, "{text}");
    }
}

#[test]
fn quoted_true_is_still_the_token_true() {
    // Only the text matters, not the style.
    assert_eq!(decode_bool("'true'"), Ok(true));
}

#[test]
fn integers_parse_whole_text() {
    assert_eq!(decode_int("42"), Ok(42));
    assert_eq!(decode_int("-7"), Ok(-7));
    assert_eq!(decode_int("9223372036854775807"), Ok(i64::MAX));

    for text in ["42abc", "", "'  4'", "0x10", "1.5", "9223372036854775808"] {
        let err = decode_int(text).unwrap_err();
        assert_ne!(err.kind(), ErrorKind::InvalidBooleanToken, "{text:?}");
    }
    let err = decode_int("42abc").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SystemError);
    assert!(err.detail().expect("detail").contains("invalid digit"));
    assert_eq!(err.location().map(|l| (l.line(), l.column())), Some((1, 1)));
}

#[test]
fn failed_conversion_does_not_consume() {
    let mut de = Decoder::from_str("[abc]").expect("open");
    let mut seen = Vec::new();
    let err = de
        .decode_list(|de, _| {
            seen.push(de.peek_kind()?);
            de.decode_int().map(|_| ())
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CallbackSignaledError);
    assert_eq!(seen, vec![yaml_visit::EventKind::Scalar]);
    assert_eq!(
        de.last_error().map(|e| e.kind()),
        Some(ErrorKind::SystemError)
    );
}

#[test]
fn strings_are_owned_copies() {
    let text = String::from("greeting: \"hello\\tworld\"\n");
    let mut de = Decoder::from_str(&text).expect("open");
    let mut value = String::new();
    de.decode_map(|de, _| {
        value = de.decode_string()?;
        Ok::<(), yaml_visit::Error>(())
    })
    .expect("map");
    de.release();
    drop(text);
    assert_eq!(value, "hello\tworld");
}

#[test]
fn scalar_readers_reject_containers() {
    let mut de = Decoder::from_str("{a: 1}").expect("open");
    let err = de.decode_string().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEvent);
    assert!(err.detail().expect("detail").contains("mapping start"));

    let mut de = Decoder::from_str("plain").expect("open");
    let err = de.decode_map(|_, _| Ok::<(), yaml_visit::Error>(())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEvent);
}
