use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use super::SigningSecret;

type HmacSha256 = Hmac<Sha256>;

/// Fixed JOSE-style header carried by every token.
#[derive(Serialize)]
struct TokenHeader {
    alg: &'static str,
    typ: &'static str,
}

const HEADER: TokenHeader = TokenHeader {
    alg: "HS256",
    typ: "JWT",
};

/// Why a token was rejected. These are entitlement denials, not faults.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is not three dot-separated segments")]
    BadFormat,

    #[error("token signature does not match")]
    BadSignature,

    #[error("token payload is malformed: {0}")]
    BadPayload(String),

    #[error("token expired at {0}")]
    Expired(i64),
}

impl TokenError {
    /// Short machine-readable reason returned to clients.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::BadFormat => "bad_format",
            TokenError::BadSignature => "bad_signature",
            TokenError::BadPayload(_) => "bad_payload",
            TokenError::Expired(_) => "expired",
        }
    }
}

/// Sign `payload` into a compact `header.payload.signature` token.
///
/// Only serializing the payload can fail.
pub fn encode<T: Serialize>(payload: &T, secret: &SigningSecret) -> serde_json::Result<String> {
    let header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&HEADER)?);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload)?);
    let signature = sign(&header, &payload, secret);

    Ok(format!("{}.{}.{}", header, payload, signature))
}

/// Verify a token against the current time and extract its payload.
pub fn verify<T: DeserializeOwned>(token: &str, secret: &SigningSecret) -> Result<T, TokenError> {
    verify_at(token, secret, Utc::now().timestamp())
}

/// Verify a token as of `now` (Unix seconds).
///
/// Checks run in order: segment structure, signature, payload parsing, then
/// `expiresAt` when the payload carries one.
pub fn verify_at<T: DeserializeOwned>(
    token: &str,
    secret: &SigningSecret,
    now: i64,
) -> Result<T, TokenError> {
    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::BadFormat);
    };

    // Compare the encoded forms so a signature segment only verifies if it
    // is byte-for-byte what we would have produced.
    let expected = sign(header, payload, secret);
    if !constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
        return Err(TokenError::BadSignature);
    }

    let payload_bytes = URL_SAFE_NO_PAD.decode(payload).map_err(|e| {
        tracing::debug!("Invalid base64 encoding in token payload: {}", e);
        TokenError::BadPayload("invalid encoding".to_string())
    })?;

    let value: Value = serde_json::from_slice(&payload_bytes)
        .map_err(|e| TokenError::BadPayload(e.to_string()))?;

    let expires_at = expires_at(&value)?;

    let claims: T =
        serde_json::from_value(value).map_err(|e| TokenError::BadPayload(e.to_string()))?;

    if let Some(expires_at) = expires_at {
        if now > expires_at {
            return Err(TokenError::Expired(expires_at));
        }
    }

    Ok(claims)
}

/// Reads the optional `expiresAt` claim. A present but non-integer value is
/// rejected rather than ignored.
fn expires_at(value: &Value) -> Result<Option<i64>, TokenError> {
    match value.get("expiresAt") {
        None | Some(Value::Null) => Ok(None),
        Some(exp) => exp
            .as_i64()
            .map(Some)
            .ok_or_else(|| TokenError::BadPayload("expiresAt is not an integer".to_string())),
    }
}

fn sign(header: &str, payload: &str, secret: &SigningSecret) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(header.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

fn constant_time_eq(expected: &[u8], provided: &[u8]) -> bool {
    // Length is not secret: it is always 43 characters for HMAC-SHA256.
    if expected.len() != provided.len() {
        return false;
    }
    expected.ct_eq(provided).into()
}
