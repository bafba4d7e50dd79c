//! Quoting decisions for the text emitter.

/// Characters that may not start a plain scalar.
#[inline]
fn is_indicator(b: u8) -> bool {
    matches!(
        b,
        b'-' | b'?'
            | b':'
            | b'['
            | b']'
            | b'{'
            | b'}'
            | b','
            | b'#'
            | b'&'
            | b'*'
            | b'!'
            | b'|'
            | b'>'
            | b'\''
            | b'"'
            | b'%'
            | b'@'
            | b'`'
    )
}

/// `---` or `...` followed by whitespace or the end of text reads as a document boundary
/// at the start of a line.
fn is_document_marker(s: &str) -> bool {
    let Some(rest) = s.strip_prefix("---").or_else(|| s.strip_prefix("...")) else {
        return false;
    };
    rest.chars().next().is_none_or(char::is_whitespace)
}

/// Shape checks shared by keys and values: would the text survive as a plain block scalar?
fn plain_shape_ok(s: &str) -> bool {
    let bytes = s.as_bytes();
    let (Some(&first), Some(&last)) = (bytes.first(), bytes.last()) else {
        return false;
    };
    if first.is_ascii_whitespace() || last.is_ascii_whitespace() || is_indicator(first) {
        return false;
    }
    if last == b':' {
        return false;
    }
    if s.chars().any(|c| c.is_control()) {
        return false;
    }
    if is_document_marker(s) {
        return false;
    }
    // ": " starts a mapping value, " #" starts a comment.
    !(s.contains(": ") || s.contains(" #"))
}

/// Returns true if `s` can be emitted as a plain mapping key without quoting.
#[inline]
pub(crate) fn is_plain_safe(s: &str) -> bool {
    if !plain_shape_ok(s) {
        return false;
    }
    if s == "~" || s.eq_ignore_ascii_case("null") {
        return false;
    }
    !(s.contains(':') || s.contains('#'))
}

/// Returns true if `s` can be emitted as a plain scalar in value position without quoting.
///
/// The caller decides whether the text should resolve as a string; this only checks that
/// the scalar text comes back unchanged.
#[inline]
pub(crate) fn is_plain_value_safe(s: &str) -> bool {
    plain_shape_ok(s)
}

/// Single-quoted style cannot carry escapes; these strings need double quotes.
#[inline]
pub(crate) fn needs_double_quotes(s: &str) -> bool {
    s.chars().any(|c| {
        c == '\\'
            || c.is_control()
            || matches!(c, '\u{FEFF}' | '\u{0085}' | '\u{2028}' | '\u{2029}')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_keys_are_plain() {
        assert!(is_plain_safe("a_number"));
        assert!(is_plain_safe("list of four"));
        assert!(is_plain_safe("true"));
    }

    #[test]
    fn ambiguous_keys_are_quoted() {
        for key in ["", " lead", "trail ", "-dash", "a: b", "a:b", "x #y", "null", "~", "[x]"] {
            assert!(!is_plain_safe(key), "{key:?} should be quoted");
        }
    }

    #[test]
    fn document_markers_are_quoted() {
        for text in ["...", "... x", "---", "--- y", "...\tz"] {
            assert!(!is_plain_safe(text), "{text:?} key should be quoted");
            assert!(!is_plain_value_safe(text), "{text:?} value should be quoted");
        }
        assert!(is_plain_safe("...x"));
        assert!(is_plain_value_safe("....."));
    }

    #[test]
    fn values_allow_inner_colons() {
        assert!(is_plain_value_safe("http://example.com"));
        assert!(is_plain_value_safe("42"));
        assert!(!is_plain_value_safe("ends:"));
        assert!(!is_plain_value_safe("line\nbreak"));
    }

    #[test]
    fn escapes_need_double_quotes() {
        assert!(needs_double_quotes("tab\there"));
        assert!(needs_double_quotes("back\\slash"));
        assert!(!needs_double_quotes("it's"));
    }
}
