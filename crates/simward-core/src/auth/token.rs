//! Compact signed-token payload inspection.
//!
//! Only the middle segment of the `header.payload.signature` form is
//! decoded, to read the expiry claim. The signature is never verified
//! here: the check this enables is a UX gate that avoids dispatching a
//! doomed request, not a security boundary.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AuthError;

/// Claims read out of the payload segment. Unknown claims are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenPayload {
    /// Expiry, seconds since epoch
    #[serde(default)]
    pub exp: Option<i64>,
    /// Subject the token was issued for
    #[serde(default)]
    pub sub: Option<String>,
}

impl TokenPayload {
    /// Expiry as a UTC timestamp, if the token carries one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Decode the payload segment of a three-segment compact token.
///
/// Fails with `MalformedToken` when the string does not have exactly
/// three dot-separated segments, or the middle segment is not
/// base64url-encoded JSON.
pub fn decode_payload(token: &str) -> Result<TokenPayload, AuthError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthError::MalformedToken);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| AuthError::MalformedToken)?;

    serde_json::from_slice(&bytes).map_err(|_| AuthError::MalformedToken)
}

/// Build an unsigned token whose payload carries the given claims.
/// Test fixture only - the signature segment is garbage.
#[cfg(test)]
pub(crate) fn unsigned_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.sig")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_valid_payload() {
        let token = unsigned_token(&json!({"exp": 1_900_000_000, "sub": "u1"}));
        let payload = decode_payload(&token).expect("token should decode");
        assert_eq!(payload.exp, Some(1_900_000_000));
        assert_eq!(payload.sub.as_deref(), Some("u1"));
    }

    #[test]
    fn test_decode_missing_exp() {
        let token = unsigned_token(&json!({"sub": "u1"}));
        let payload = decode_payload(&token).expect("token should decode");
        assert!(payload.exp.is_none());
        assert!(payload.expires_at().is_none());
    }

    #[test]
    fn test_decode_rejects_wrong_segment_count() {
        assert!(matches!(
            decode_payload("only-one-segment"),
            Err(AuthError::MalformedToken)
        ));
        assert!(matches!(
            decode_payload("two.segments"),
            Err(AuthError::MalformedToken)
        ));
        assert!(matches!(
            decode_payload("a.b.c.d"),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(matches!(
            decode_payload("header.!!!not-base64!!!.sig"),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn test_decode_rejects_non_json_payload() {
        let body = URL_SAFE_NO_PAD.encode("this is not json");
        let token = format!("header.{body}.sig");
        assert!(matches!(
            decode_payload(&token),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn test_expires_at_conversion() {
        let payload = TokenPayload {
            exp: Some(0),
            sub: None,
        };
        let expiry = payload.expires_at().expect("epoch zero is representable");
        assert_eq!(expiry.timestamp(), 0);
    }
}
