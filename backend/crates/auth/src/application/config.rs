//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
pub use platform::cookie::SameSite;

/// Secret used when `JWT_SECRET` is not configured
pub const FALLBACK_JWT_SECRET: &str = "very_secret_key";

/// Credentials accepted by HTTP Basic on admin endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub login: String,
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            login: "admin".to_string(),
            password: "qwerty".to_string(),
        }
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret shared by access and refresh tokens
    pub jwt_secret: String,
    /// Access token lifetime (10 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token and device session lifetime (20 seconds)
    pub refresh_token_ttl: Duration,
    /// Email confirmation code lifetime (1 hour)
    pub confirmation_code_ttl: Duration,
    /// Password recovery code lifetime (1 hour)
    pub recovery_code_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    pub admin: AdminCredentials,
    /// Base for links in outgoing emails; `https://<Host>` when unset
    pub public_base_url: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: FALLBACK_JWT_SECRET.to_string(),
            access_token_ttl: Duration::from_secs(600),
            refresh_token_ttl: Duration::from_secs(20),
            confirmation_code_ttl: Duration::from_secs(3600),
            recovery_code_ttl: Duration::from_secs(3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            admin: AdminCredentials::default(),
            public_base_url: None,
        }
    }
}

impl AuthConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Cookie carrying the refresh token; lives as long as the token
    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig {
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            max_age_secs: Some(duration_secs(self.refresh_token_ttl)),
            ..CookieConfig::default()
        }
    }

    pub fn access_token_ttl_secs(&self) -> i64 {
        duration_secs(self.access_token_ttl)
    }

    pub fn refresh_token_ttl_secs(&self) -> i64 {
        duration_secs(self.refresh_token_ttl)
    }

    /// Device sessions expire together with their refresh token
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.refresh_token_ttl_secs())
    }

    pub fn confirmation_code_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(duration_secs(self.confirmation_code_ttl))
    }

    pub fn recovery_code_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(duration_secs(self.recovery_code_ttl))
    }
}

fn duration_secs(duration: Duration) -> i64 {
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_ttl_secs(), 600);
        assert_eq!(config.refresh_token_ttl_secs(), 20);
        assert_eq!(config.admin.login, "admin");
        assert_eq!(config.admin.password, "qwerty");
    }

    #[test]
    fn test_refresh_cookie_follows_token_ttl() {
        let cookie = AuthConfig::default().refresh_cookie();
        assert_eq!(cookie.name, "refreshToken");
        assert_eq!(cookie.max_age_secs, Some(20));
        assert!(cookie.secure);
        assert!(cookie.http_only);
    }

    #[test]
    fn test_development_cookie_is_not_secure() {
        assert!(!AuthConfig::development().refresh_cookie().secure);
    }
}
