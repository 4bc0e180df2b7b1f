//! Cloudflare "email protection" de-obfuscation.

use super::primitives::hex_to_bytes;
use crate::error::{Result, ToolError};

/// The first hex byte is an XOR key applied to every following byte.
pub fn decode_cloudflare_email(encoded: &str) -> Result<String> {
    let bytes = hex_to_bytes(encoded)?;
    let (key, body) = bytes
        .split_first()
        .ok_or_else(|| ToolError::decode("input is empty"))?;
    Ok(body.iter().map(|byte| char::from(byte ^ key)).collect())
}
