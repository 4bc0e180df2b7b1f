//! Percent-encoding of URL components.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, ToolError};

static LONE_PERCENT: OnceLock<Regex> = OnceLock::new();

fn lone_percent() -> &'static Regex {
    LONE_PERCENT.get_or_init(|| Regex::new(r"%([0-9A-Fa-f]{2})?").expect("valid regex"))
}

/// Escapes that `encodeURIComponent` leaves as literal characters.
const COMPONENT_LITERALS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Encodes everything outside the unreserved set plus `!'()*`, matching
/// `encodeURIComponent`.
pub fn url_encode(input: &str) -> String {
    let mut encoded = urlencoding::encode(input).into_owned();
    for (escape, literal) in COMPONENT_LITERALS {
        if encoded.contains(escape) {
            encoded = encoded.replace(escape, literal);
        }
    }
    encoded
}

/// Decodes `%XX` escapes. A `%` that does not start a two-digit hex escape
/// is kept as a literal percent sign.
pub fn url_decode(input: &str) -> Result<String> {
    let escaped = lone_percent().replace_all(input, |caps: &regex::Captures<'_>| {
        match caps.get(1) {
            Some(hex) => format!("%{}", hex.as_str()),
            None => "%25".to_string(),
        }
    });
    urlencoding::decode(&escaped)
        .map(|cow| cow.into_owned())
        .map_err(|err| ToolError::decode(format!("invalid URL encoding: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encodes_reserved_characters() {
        assert_eq!(url_encode("a b&c=d/é"), "a%20b%26c%3Dd%2F%C3%A9");
        assert_eq!(url_encode("safe-._~"), "safe-._~");
    }

    #[test]
    fn leaves_component_punctuation_unescaped() {
        assert_eq!(url_encode("(hi)!*'"), "(hi)!*'");
        assert_eq!(url_encode("%21 (x)"), "%2521%20(x)");
        assert_eq!(url_decode(&url_encode("it's (ok)!")).unwrap(), "it's (ok)!");
    }

    #[test]
    fn decodes_escapes() {
        assert_eq!(url_decode("a%20b%26c").unwrap(), "a b&c");
        assert_eq!(url_decode("%C3%A9").unwrap(), "é");
    }

    #[test]
    fn keeps_lone_percent_signs() {
        assert_eq!(url_decode("100% sure %2").unwrap(), "100% sure %2");
    }

    #[test]
    fn rejects_invalid_utf8_sequences() {
        assert!(matches!(url_decode("%FF%FE"), Err(ToolError::Decode(_))));
    }
}
