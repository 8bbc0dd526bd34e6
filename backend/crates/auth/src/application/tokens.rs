//! Access and refresh tokens
//!
//! Both are HS256 JWTs signed with the same secret. A refresh token names
//! its device and the token id of the device's current rotation.

use chrono::{DateTime, Utc};
use kernel::id::{DeviceId, UserId};
use platform::jwt::{JwtCodec, JwtError};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::entity::device_session::DeviceSession;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub user_id: UserId,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshClaims {
    pub user_id: UserId,
    pub device_id: DeviceId,
    pub token_id: String,
    pub iat: i64,
    pub exp: i64,
}

/// Access token plus the refresh token for one device rotation
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub struct TokenService {
    codec: JwtCodec,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            codec: JwtCodec::new(config.jwt_secret.as_bytes()),
            access_ttl_secs: config.access_token_ttl_secs(),
            refresh_ttl_secs: config.refresh_token_ttl_secs(),
        }
    }

    pub fn issue_access(&self, user_id: UserId, now: DateTime<Utc>) -> Result<String, JwtError> {
        let iat = now.timestamp();
        self.codec.encode(&AccessClaims {
            user_id,
            iat,
            exp: iat + self.access_ttl_secs,
        })
    }

    /// Tokens for the session's current rotation, issued at its last activity
    pub fn issue_pair(&self, session: &DeviceSession) -> Result<TokenPair, JwtError> {
        let iat = session.last_active_date.timestamp();
        let refresh_token = self.codec.encode(&RefreshClaims {
            user_id: session.user_id,
            device_id: session.device_id,
            token_id: session.token_id.clone(),
            iat,
            exp: iat + self.refresh_ttl_secs,
        })?;
        Ok(TokenPair {
            access_token: self.issue_access(session.user_id, session.last_active_date)?,
            refresh_token,
        })
    }

    pub fn verify_access(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, JwtError> {
        self.codec.decode(token, now.timestamp())
    }

    pub fn verify_refresh(&self, token: &str, now: DateTime<Utc>) -> Result<RefreshClaims, JwtError> {
        self.codec.decode(token, now.timestamp())
    }
}
