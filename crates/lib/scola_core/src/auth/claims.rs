//! Bearer token claim decoding.
//!
//! Reads `sub` and `exp` out of the payload segment. The signature is never
//! checked: this establishes structure, not authenticity.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

use super::AuthError;
use crate::models::auth::DecodedClaims;

/// Decode the claims of a `header.payload.signature` token.
pub fn decode(token: &str) -> Result<DecodedClaims, AuthError> {
    if token.is_empty() {
        return Err(AuthError::MalformedToken("empty token".into()));
    }

    let mut segments = token.split('.');
    let _header = segments.next();
    let payload = segments
        .next()
        .ok_or_else(|| AuthError::MalformedToken("missing payload segment".into()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AuthError::MalformedToken(format!("base64: {e}")))?;

    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::MalformedToken(format!("json: {e}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| AuthError::MalformedToken("payload is not a JSON object".into()))?;

    let subject = object
        .get("sub")
        .and_then(Value::as_str)
        .ok_or_else(|| AuthError::MalformedToken("missing 'sub' claim".into()))?;
    let expires_at = object
        .get("exp")
        .and_then(epoch_seconds)
        .ok_or_else(|| AuthError::MalformedToken("missing 'exp' claim".into()))?;

    Ok(DecodedClaims {
        subject: subject.to_string(),
        expires_at,
        issued_at: object.get("iat").and_then(epoch_seconds),
    })
}

fn epoch_seconds(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|secs| secs.trunc() as i64))
}
