//! User Entity
//!
//! An account plus its pending email-confirmation and password-recovery codes.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::value_object::{email::Email, expiring_code::ExpiringCode, login::Login};

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub login: Login,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub created_at: DateTime<Utc>,
    pub is_confirmed: bool,
    /// Pending email confirmation; `None` once confirmed
    pub confirmation: Option<ExpiringCode>,
    /// Pending password recovery
    pub recovery: Option<ExpiringCode>,
}

impl User {
    /// Self-registered user awaiting email confirmation
    pub fn register(
        login: Login,
        email: Email,
        password_hash: HashedPassword,
        now: DateTime<Utc>,
        confirmation_ttl: Duration,
    ) -> Self {
        Self {
            id: UserId::new(),
            login,
            email,
            password_hash,
            created_at: now,
            is_confirmed: false,
            confirmation: Some(ExpiringCode::issue(now, confirmation_ttl)),
            recovery: None,
        }
    }

    /// User created by an administrator; no confirmation needed
    pub fn create_confirmed(
        login: Login,
        email: Email,
        password_hash: HashedPassword,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            login,
            email,
            password_hash,
            created_at: now,
            is_confirmed: true,
            confirmation: None,
            recovery: None,
        }
    }

    /// Mark the email confirmed if `code` is the live confirmation code
    pub fn confirm(&mut self, code: &str, now: DateTime<Utc>) -> bool {
        if self.is_confirmed {
            return false;
        }
        match &self.confirmation {
            Some(pending) if pending.accepts(code, now) => {
                self.is_confirmed = true;
                self.confirmation = None;
                true
            }
            _ => false,
        }
    }

    /// Replace the confirmation code; the previous one stops working
    pub fn renew_confirmation(&mut self, now: DateTime<Utc>, ttl: Duration) -> &ExpiringCode {
        self.confirmation.insert(ExpiringCode::issue(now, ttl))
    }

    pub fn start_recovery(&mut self, now: DateTime<Utc>, ttl: Duration) -> &ExpiringCode {
        self.recovery.insert(ExpiringCode::issue(now, ttl))
    }

    /// Swap in a new password hash if `code` is the live recovery code.
    /// The recovery code is single-use.
    pub fn reset_password(
        &mut self,
        code: &str,
        now: DateTime<Utc>,
        new_hash: HashedPassword,
    ) -> bool {
        match &self.recovery {
            Some(pending) if pending.accepts(code, now) => {
                self.password_hash = new_hash;
                self.recovery = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::ClearTextPassword;

    fn hash(raw: &str) -> HashedPassword {
        ClearTextPassword::new(raw.to_string())
            .unwrap()
            .hash()
            .unwrap()
    }

    fn registered(now: DateTime<Utc>) -> User {
        User::register(
            Login::new("alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            hash("secret1"),
            now,
            Duration::hours(1),
        )
    }

    #[test]
    fn test_register_is_unconfirmed_with_code() {
        let user = registered(Utc::now());
        assert!(!user.is_confirmed);
        assert!(user.confirmation.is_some());
        assert!(user.recovery.is_none());
    }

    #[test]
    fn test_confirm_consumes_code() {
        let now = Utc::now();
        let mut user = registered(now);
        let code = user.confirmation.clone().unwrap().code;

        assert!(!user.confirm("wrong", now));
        assert!(user.confirm(&code, now));
        assert!(user.is_confirmed);
        assert!(user.confirmation.is_none());
        assert!(!user.confirm(&code, now));
    }

    #[test]
    fn test_confirm_rejects_expired_code() {
        let now = Utc::now();
        let mut user = registered(now);
        let code = user.confirmation.clone().unwrap().code;
        assert!(!user.confirm(&code, now + Duration::hours(2)));
        assert!(!user.is_confirmed);
    }

    #[test]
    fn test_renew_invalidates_old_code() {
        let now = Utc::now();
        let mut user = registered(now);
        let old = user.confirmation.clone().unwrap().code;
        let new = user.renew_confirmation(now, Duration::hours(1)).code.clone();

        assert_ne!(old, new);
        assert!(!user.confirm(&old, now));
        assert!(user.confirm(&new, now));
    }

    #[test]
    fn test_reset_password_is_single_use() {
        let now = Utc::now();
        let mut user = registered(now);
        let code = user.start_recovery(now, Duration::hours(1)).code.clone();

        assert!(user.reset_password(&code, now, hash("newpass1")));
        assert!(
            user.password_hash
                .verify(&ClearTextPassword::for_verification("newpass1".to_string()))
        );
        assert!(!user.reset_password(&code, now, hash("another1")));
    }
    #[test]
    fn test_reset_password_rejects_expired_code() {
        let now = Utc::now();
        let mut user = registered(now);
        let original = user.password_hash.clone();
        let code = user.start_recovery(now, Duration::hours(1)).code.clone();

        let late = now + Duration::hours(1) + Duration::seconds(1);
        assert!(!user.reset_password(&code, late, hash("newpass1")));
        assert_eq!(user.password_hash, original);
        assert!(user.recovery.is_some());
    }
}
