//! Device Session Entity
//!
//! One refresh-token lineage per logged-in device. Each refresh rotates
//! `token_id`; only the refresh token carrying the current `token_id`
//! is accepted.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{DeviceId, UserId};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct DeviceSession {
    pub device_id: DeviceId,
    pub user_id: UserId,
    /// Id of the only refresh token currently valid for this device
    pub token_id: String,
    pub ip: String,
    pub title: String,
    /// Issue time of the current refresh token
    pub last_active_date: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl DeviceSession {
    /// New device for a successful login
    pub fn start(
        user_id: UserId,
        ip: impl Into<String>,
        title: impl Into<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            device_id: DeviceId::new(),
            user_id,
            token_id: new_token_id(),
            ip: ip.into(),
            title: title.into(),
            last_active_date: now,
            expires_at: now + ttl,
        }
    }

    /// Move to a fresh refresh token; returns the id it replaced
    pub fn rotate(&mut self, now: DateTime<Utc>, ttl: Duration) -> String {
        let previous = std::mem::replace(&mut self.token_id, new_token_id());
        self.last_active_date = now;
        self.expires_at = now + ttl;
        previous
    }

    /// Whether a refresh token with `token_id` is the live one
    pub fn is_current(&self, token_id: &str, now: DateTime<Utc>) -> bool {
        self.token_id == token_id && now <= self.expires_at
    }
}

fn new_token_id() -> String {
    Uuid::new_v4().to_string()
}
