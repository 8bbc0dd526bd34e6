//! HS256 JSON Web Tokens
//!
//! Compact `header.payload.signature` tokens signed with HMAC-SHA256.
//! Only the `HS256` algorithm is accepted; `exp` (unix seconds) is
//! mandatory and checked on decode.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::{constant_time_eq, from_base64url, hmac_sha256, to_base64url};

const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Malformed token")]
    Malformed,

    #[error("Unsupported algorithm")]
    UnsupportedAlgorithm,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Invalid claims: {0}")]
    Claims(#[from] serde_json::Error),
}

/// Signs and verifies HS256 tokens with a shared secret
#[derive(Clone)]
pub struct JwtCodec {
    secret: Zeroizing<Vec<u8>>,
}

impl JwtCodec {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: Zeroizing::new(secret.as_ref().to_vec()),
        }
    }

    /// Serialize `claims` and sign them
    pub fn encode<C: Serialize>(&self, claims: &C) -> Result<String, JwtError> {
        let payload = serde_json::to_vec(claims)?;
        let signing_input = format!(
            "{}.{}",
            to_base64url(HEADER.as_bytes()),
            to_base64url(&payload)
        );
        let signature = hmac_sha256(&self.secret, signing_input.as_bytes());
        Ok(format!("{}.{}", signing_input, to_base64url(&signature)))
    }

    /// Verify signature and expiry (`exp >= now_secs`), then parse claims
    pub fn decode<C: DeserializeOwned>(&self, token: &str, now_secs: i64) -> Result<C, JwtError> {
        let mut parts = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(JwtError::Malformed);
        };

        let header_json: Value =
            serde_json::from_slice(&from_base64url(header).map_err(|_| JwtError::Malformed)?)?;
        if header_json.get("alg").and_then(Value::as_str) != Some("HS256") {
            return Err(JwtError::UnsupportedAlgorithm);
        }

        let provided = from_base64url(signature).map_err(|_| JwtError::Malformed)?;
        let signing_input = &token[..header.len() + 1 + payload.len()];
        let expected = hmac_sha256(&self.secret, signing_input.as_bytes());
        if !constant_time_eq(&provided, &expected) {
            return Err(JwtError::InvalidSignature);
        }

        let claims: Value =
            serde_json::from_slice(&from_base64url(payload).map_err(|_| JwtError::Malformed)?)?;
        let exp = claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or(JwtError::Malformed)?;
        if exp < now_secs {
            return Err(JwtError::Expired);
        }

        Ok(serde_json::from_value(claims)?)
    }
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
