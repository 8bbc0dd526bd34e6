//! Expiring one-time code (email confirmation, password recovery)

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiringCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl ExpiringCode {
    /// Random UUID v4 code valid for `ttl` from `now`
    pub fn issue(now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            code: Uuid::new_v4().to_string(),
            expires_at: now + ttl,
        }
    }

    /// `code` matches and `now` has not passed the expiry
    pub fn accepts(&self, code: &str, now: DateTime<Utc>) -> bool {
        self.code == code && now <= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_until_expiry() {
        let now = Utc::now();
        let code = ExpiringCode::issue(now, Duration::hours(1));
        assert!(code.accepts(&code.code, now));
        assert!(code.accepts(&code.code, now + Duration::hours(1)));
        assert!(!code.accepts(&code.code, now + Duration::hours(1) + Duration::seconds(1)));
    }

    #[test]
    fn test_rejects_other_code() {
        let code = ExpiringCode::issue(Utc::now(), Duration::hours(1));
        assert!(!code.accepts("not-the-code", Utc::now()));
    }

    #[test]
    fn test_codes_are_unique() {
        let now = Utc::now();
        assert_ne!(
            ExpiringCode::issue(now, Duration::hours(1)).code,
            ExpiringCode::issue(now, Duration::hours(1)).code
        );
    }
}
