//! JSON pretty-printing and minification.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::{Result, ToolError};

pub const DEFAULT_INDENT: usize = 4;
/// Wider indents are clamped to this many spaces.
pub const MAX_INDENT: usize = 16;

pub fn parse_json(input: &str) -> Result<Value> {
    serde_json::from_str(input).map_err(|err| ToolError::invalid_json(err.to_string()))
}

/// Re-renders `input` with `indent` spaces per level, at most
/// [`MAX_INDENT`]. Key order is kept.
pub fn format_json(input: &str, indent: usize) -> Result<String> {
    let value = parse_json(input)?;
    let indent = " ".repeat(indent.min(MAX_INDENT));
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|err| ToolError::invalid_json(err.to_string()))?;
    String::from_utf8(out).map_err(|err| ToolError::invalid_json(err.to_string()))
}

pub fn minify_json(input: &str) -> Result<String> {
    Ok(parse_json(input)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pretty_prints_with_requested_indent() {
        assert_eq!(
            format_json(r#"{"b":1,"a":[true,null]}"#, DEFAULT_INDENT).unwrap(),
            "{\n    \"b\": 1,\n    \"a\": [\n        true,\n        null\n    ]\n}"
        );
        assert_eq!(format_json("[1]", 2).unwrap(), "[\n  1\n]");
    }

    #[test]
    fn oversized_indent_is_clamped() {
        let expected = format!("[\n{}1\n]", " ".repeat(MAX_INDENT));
        assert_eq!(format_json("[1]", 4_000_000_000).unwrap(), expected);
    }

    #[test]
    fn minifies() {
        assert_eq!(minify_json("{ \"a\" : [ 1, 2 ] }").unwrap(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn invalid_input_is_reported() {
        assert!(matches!(format_json("{", 2), Err(ToolError::InvalidJson(_))));
    }
}
