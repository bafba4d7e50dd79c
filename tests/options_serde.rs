use yaml_visit::{DecoderOptions, EncoderOptions};

#[test]
fn options_load_from_json_config() -> anyhow::Result<()> {
    let decoder: DecoderOptions = serde_json::from_str(r#"{"max_depth": 12}"#)?;
    assert_eq!(decoder.max_depth, 12);
    assert_eq!(decoder.max_reader_bytes, None);

    let encoder: EncoderOptions =
        serde_json::from_str(r#"{"indent_step": 4, "explicit_document_end": true}"#)?;
    assert_eq!(
        encoder,
        yaml_visit::encoder_options! { indent_step: 4, explicit_document_end: true }
    );
    Ok(())
}

#[test]
fn options_survive_serialization() -> anyhow::Result<()> {
    let options = yaml_visit::encoder_options! {
        indent_sequences: true,
        version_directive: true,
    };
    let json = serde_json::to_string(&options)?;
    let back: EncoderOptions = serde_json::from_str(&json)?;
    assert_eq!(back, options);
    Ok(())
}

#[test]
fn error_codes_and_descriptions() {
    use yaml_visit::{ErrorKind, describe};

    assert_eq!(describe(0), "no error");
    assert_eq!(describe(ErrorKind::WrongType.code()), ErrorKind::WrongType.message());
    assert_eq!(describe(999), yaml_visit::NO_DESCRIPTION);
    assert_eq!(serde_json::to_string(&ErrorKind::LimitExceeded).ok().as_deref(), Some("\"LimitExceeded\""));
}
