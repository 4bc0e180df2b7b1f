//! Byte-level codecs: hex, base64, base64url and UTF-8.

use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;

use crate::error::{Result, ToolError};

pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn hex_to_bytes(input: &str) -> Result<Vec<u8>> {
    hex::decode(input.trim()).map_err(|err| ToolError::decode(err.to_string()))
}

pub fn utf8_decode(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|err| ToolError::decode(err.to_string()))
}

/// Standard alphabet, padded output of the UTF-8 bytes of `text`.
pub fn encode_base64(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

pub fn decode_base64_bytes(input: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(input.trim().as_bytes())
        .map_err(|err| ToolError::decode(err.to_string()))
}

pub fn decode_base64(input: &str) -> Result<String> {
    utf8_decode(decode_base64_bytes(input)?)
}

/// URL-safe alphabet without padding, the form used inside JWTs.
pub fn encode_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Restores the padding implied by the length before decoding: a remainder
/// of 2 gets `==`, 3 gets `=`, 0 nothing. A remainder of 1 can never come
/// out of an encoder.
pub fn decode_base64url_bytes(segment: &str) -> Result<Vec<u8>> {
    let mut normalized = segment.trim().to_string();
    match normalized.len() % 4 {
        0 => {}
        2 => normalized.push_str("=="),
        3 => normalized.push('='),
        _ => {
            return Err(ToolError::decode(format!(
                "invalid base64url length {}",
                normalized.len()
            )))
        }
    }
    URL_SAFE
        .decode(normalized.as_bytes())
        .map_err(|err| ToolError::decode(err.to_string()))
}

pub fn decode_base64url(segment: &str) -> Result<String> {
    utf8_decode(decode_base64url_bytes(segment)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hex_accepts_either_case() {
        assert_eq!(hex_to_bytes(" 0aFF ").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(bytes_to_hex(&[0x0a, 0xff]), "0aff");
    }

    #[test]
    fn hex_rejects_odd_length() {
        let err = hex_to_bytes("abc").unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[test]
    fn base64_encodes_utf8_text() {
        assert_eq!(encode_base64("hello"), "aGVsbG8=");
        assert_eq!(decode_base64("aGVsbG8=").unwrap(), "hello");
        assert_eq!(decode_base64(&encode_base64("héllo ✓")).unwrap(), "héllo ✓");
    }

    #[test]
    fn base64_rejects_foreign_characters() {
        assert!(matches!(decode_base64("aGV*bG8="), Err(ToolError::Decode(_))));
    }

    #[test]
    fn base64_rejects_bad_padding() {
        assert!(matches!(decode_base64("aGVsbG8"), Err(ToolError::Decode(_))));
        assert!(matches!(decode_base64("aGVsbG8=="), Err(ToolError::Decode(_))));
    }

    #[test]
    fn base64_rejects_non_utf8_payload() {
        // 0xff 0xfe is not valid UTF-8
        assert!(matches!(decode_base64("//4="), Err(ToolError::Decode(_))));
        assert_eq!(decode_base64_bytes("//4=").unwrap(), vec![0xff, 0xfe]);
    }

    #[test]
    fn base64url_restores_padding_from_length() {
        // "ab" -> "YWI" (remainder 3), "a" -> "YQ" (remainder 2)
        assert_eq!(decode_base64url("YWI").unwrap(), "ab");
        assert_eq!(decode_base64url("YQ").unwrap(), "a");
        assert_eq!(decode_base64url("YWJj").unwrap(), "abc");
    }

    #[test]
    fn base64url_uses_dash_and_underscore() {
        let encoded = encode_base64url(&[0xfb, 0xff]);
        assert_eq!(encoded, "-_8");
        assert_eq!(decode_base64url_bytes(&encoded).unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn base64url_rejects_impossible_length() {
        let err = decode_base64url_bytes("YWJjZ").unwrap_err();
        assert!(err.to_string().contains("length"), "msg: {err}");
    }
}
