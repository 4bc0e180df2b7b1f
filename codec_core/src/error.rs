//! Failure taxonomy shared by every tool.
//!
//! Each tool call either returns a value or one of these tagged failures;
//! the wasm layer turns the failure into the string the page shows.

use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, ToolError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    /// Malformed base64, base64url, hex, percent-encoding or UTF-8 bytes.
    #[error("decode error: {0}")]
    Decode(String),

    /// A token that does not split into the expected parts.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Input that parses but does not have the shape the tool expects.
    #[error("format error: {0}")]
    Format(String),
}

impl ToolError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn malformed_token(msg: impl Into<String>) -> Self {
        Self::MalformedToken(msg.into())
    }

    pub fn invalid_json(msg: impl Into<String>) -> Self {
        Self::InvalidJson(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Stable tag for callers that switch on the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::MalformedToken(_) => "malformed_token",
            Self::InvalidJson(_) => "invalid_json",
            Self::Format(_) => "format",
        }
    }
}

impl From<ToolError> for JsValue {
    fn from(err: ToolError) -> Self {
        tracing::debug!(kind = err.kind(), %err, "tool call failed");
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_prefixes_the_failure_kind() {
        assert_eq!(
            ToolError::decode("bad padding").to_string(),
            "decode error: bad padding"
        );
        assert_eq!(
            ToolError::malformed_token("expected header.payload").to_string(),
            "malformed token: expected header.payload"
        );
    }

    #[test]
    fn kind_tags_are_stable() {
        assert_eq!(ToolError::invalid_json("x").kind(), "invalid_json");
        assert_eq!(ToolError::format("x").kind(), "format");
        assert_eq!(ToolError::decode("x").kind(), "decode");
        assert_eq!(ToolError::malformed_token("x").kind(), "malformed_token");
    }
}
