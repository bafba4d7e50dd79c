//! Public macros for constructing option structs without relying on struct literal syntax.
//!
//! These keep call sites ergonomic while the option structs gain fields over time.

/// Construct [`crate::DecoderOptions`] from `Default` and a list of field assignments.
///
/// ```rust
/// let options = yaml_visit::decoder_options! {
///     max_depth: 16,
///     max_reader_bytes: Some(1 << 20),
/// };
/// assert_eq!(options.max_depth, 16);
/// ```
#[macro_export]
macro_rules! decoder_options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::DecoderOptions::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}

/// Construct [`crate::EncoderOptions`] from `Default` and a list of field assignments.
///
/// ```rust
/// let options = yaml_visit::encoder_options! {
///     indent_step: 4,
///     explicit_document_end: true,
/// };
/// assert_eq!(options.indent_step, 4);
/// ```
#[macro_export]
macro_rules! encoder_options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::EncoderOptions::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}
