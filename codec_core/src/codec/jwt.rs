//! JSON Web Token inspection and HMAC signing.

use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::Value;
use sha2::{Sha256, Sha384, Sha512};

use super::primitives::{decode_base64url_bytes, encode_base64url, utf8_decode};
use crate::error::{Result, ToolError};

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DecodedJwt {
    pub header: Value,
    pub payload: Value,
    pub signature: Option<String>,
    pub algorithm: Option<String>,
}

/// Splits `header.payload[.signature]` and decodes the first two parts as
/// base64url JSON. Part count, base64url/UTF-8 and JSON failures are
/// reported as distinct error kinds.
pub fn decode_jwt(token: &str) -> Result<DecodedJwt> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(ToolError::malformed_token("token is empty"));
    }
    let segments: Vec<&str> = trimmed.split('.').collect();
    if !(2..=3).contains(&segments.len()) {
        return Err(ToolError::malformed_token(format!(
            "expected header.payload[.signature], got {} part(s)",
            segments.len()
        )));
    }
    let header = decode_part("header", segments[0])?;
    let payload = decode_part("payload", segments[1])?;
    let signature = segments
        .get(2)
        .and_then(|sig| (!sig.is_empty()).then(|| (*sig).to_string()));
    let algorithm = header
        .get("alg")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(DecodedJwt {
        header,
        payload,
        signature,
        algorithm,
    })
}

fn decode_part(name: &str, segment: &str) -> Result<Value> {
    let bytes = decode_base64url_bytes(segment)
        .map_err(|err| ToolError::decode(format!("{name}: {err}")))?;
    let text =
        utf8_decode(bytes).map_err(|err| ToolError::decode(format!("{name}: {err}")))?;
    serde_json::from_str(&text).map_err(|err| ToolError::invalid_json(format!("{name}: {err}")))
}

/// Builds an HS256/HS384/HS512 token around `payload_json`. An empty
/// algorithm means HS256.
pub fn encode_jwt(payload_json: &str, secret: &str, algorithm: &str) -> Result<String> {
    if secret.trim().is_empty() {
        return Err(ToolError::format("secret is required"));
    }
    let algo = match algorithm.trim() {
        "" => "HS256",
        other => other,
    };
    let payload: Value = serde_json::from_str(payload_json)
        .map_err(|err| ToolError::invalid_json(format!("payload: {err}")))?;
    let header = serde_json::json!({
        "typ": "JWT",
        "alg": algo,
    });
    let header_encoded = encode_base64url(header.to_string().as_bytes());
    let payload_encoded = encode_base64url(payload.to_string().as_bytes());
    let signing_input = format!("{header_encoded}.{payload_encoded}");
    let signature = sign(&signing_input, secret.as_bytes(), algo)?;
    Ok(format!("{signing_input}.{signature}"))
}

fn sign(signing_input: &str, key: &[u8], algorithm: &str) -> Result<String> {
    let signature = match algorithm {
        "HS256" => mac::<Hmac<Sha256>>(key, signing_input)?,
        "HS384" => mac::<Hmac<Sha384>>(key, signing_input)?,
        "HS512" => mac::<Hmac<Sha512>>(key, signing_input)?,
        other => return Err(ToolError::format(format!("unsupported algorithm {other}"))),
    };
    Ok(encode_base64url(&signature))
}

fn mac<M: Mac + hmac::digest::KeyInit>(key: &[u8], input: &str) -> Result<Vec<u8>> {
    let mut mac =
        <M as Mac>::new_from_slice(key).map_err(|err| ToolError::format(err.to_string()))?;
    mac.update(input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}
