//! Server Configuration
//!
//! Everything is read from environment variables (optionally via `.env`).
//! Missing or unparsable values fall back to their defaults with a warning.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use auth::{AdminCredentials, AuthConfig};
use auth::application::config::FALLBACK_JWT_SECRET;
use platform::mail::MailerConfig;
use platform::rate_limit::RateLimitConfig;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    /// PostgreSQL when set, in-memory storage otherwise
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    pub mailer: MailerConfig,
    /// CORS allow-list
    pub frontend_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            auth: AuthConfig::default(),
            rate_limit: RateLimitConfig::default(),
            mailer: MailerConfig::default(),
            frontend_origins: split_origins(DEFAULT_FRONTEND_ORIGINS),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET is not set; using the insecure development secret");
            FALLBACK_JWT_SECRET.to_string()
        });

        let auth_defaults = AuthConfig::default();
        let auth = AuthConfig {
            jwt_secret,
            access_token_ttl: secs_or(
                get("ACCESS_TOKEN_TTL_SECONDS"),
                "ACCESS_TOKEN_TTL_SECONDS",
                auth_defaults.access_token_ttl,
            ),
            refresh_token_ttl: secs_or(
                get("REFRESH_TOKEN_TTL_SECONDS"),
                "REFRESH_TOKEN_TTL_SECONDS",
                auth_defaults.refresh_token_ttl,
            ),
            cookie_secure: parse_or(get("COOKIE_SECURE"), "COOKIE_SECURE", auth_defaults.cookie_secure),
            admin: AdminCredentials {
                login: get("ADMIN_LOGIN").unwrap_or(auth_defaults.admin.login.clone()),
                password: get("ADMIN_PASSWORD").unwrap_or(auth_defaults.admin.password.clone()),
            },
            public_base_url: get("PUBLIC_BASE_URL"),
            ..auth_defaults
        };

        let mailer = MailerConfig {
            api_token: get("MAILTRAP_API_TOKEN"),
            from_email: get("MAILTRAP_FROM_EMAIL"),
            from_name: get("MAILTRAP_FROM_NAME"),
            ..MailerConfig::default()
        };

        Self {
            port: parse_or(get("PORT"), "PORT", defaults.port),
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_or(
                get("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            ),
            auth,
            rate_limit: defaults.rate_limit,
            mailer,
            frontend_origins: get("FRONTEND_ORIGINS")
                .map(|raw| split_origins(&raw))
                .unwrap_or(defaults.frontend_origins),
        }
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> T {
    match raw {
        None => default,
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %value, "Invalid configuration value; using default");
            default
        }),
    }
}

fn secs_or(raw: Option<String>, key: &str, default: Duration) -> Duration {
    Duration::from_secs(parse_or(raw, key, default.as_secs()))
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> ApiConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.port, 3001);
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.database_max_connections, 5);
        assert_eq!(cfg.auth.jwt_secret, FALLBACK_JWT_SECRET);
        assert_eq!(cfg.auth.access_token_ttl, Duration::from_secs(600));
        assert_eq!(cfg.auth.refresh_token_ttl, Duration::from_secs(20));
        assert!(cfg.auth.cookie_secure);
        assert_eq!(cfg.auth.admin, AdminCredentials::default());
        assert_eq!(cfg.frontend_origins.len(), 2);
        assert!(cfg.mailer.api_token.is_none());
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/blog"),
            ("JWT_SECRET", "s3cret"),
            ("REFRESH_TOKEN_TTL_SECONDS", "60"),
            ("COOKIE_SECURE", "false"),
            ("ADMIN_LOGIN", "root"),
            ("FRONTEND_ORIGINS", "https://a.io, https://b.io ,"),
            ("MAILTRAP_API_TOKEN", "token"),
        ]);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/blog"));
        assert_eq!(cfg.auth.jwt_secret, "s3cret");
        assert_eq!(cfg.auth.refresh_token_ttl, Duration::from_secs(60));
        assert!(!cfg.auth.cookie_secure);
        assert_eq!(cfg.auth.admin.login, "root");
        assert_eq!(cfg.auth.admin.password, "qwerty");
        assert_eq!(cfg.frontend_origins, vec!["https://a.io", "https://b.io"]);
        assert_eq!(cfg.mailer.api_token.as_deref(), Some("token"));
    }

    #[test]
    fn test_invalid_and_blank_values_fall_back() {
        let cfg = config(&[("PORT", "not-a-port"), ("DATABASE_URL", "  "), ("JWT_SECRET", "")]);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.auth.jwt_secret, FALLBACK_JWT_SECRET);
    }
}
