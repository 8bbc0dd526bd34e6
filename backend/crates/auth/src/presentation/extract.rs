//! Request Guards
//!
//! Extractors for the three authorization schemes: bearer access token,
//! HTTP Basic administrator and refresh-token cookie.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use kernel::id::UserId;
use platform::cookie::extract_cookie;
use platform::crypto::{constant_time_eq, from_base64};

use crate::application::config::AdminCredentials;
use crate::application::session::AuthenticateRefreshUseCase;
use crate::application::tokens::TokenService;
use crate::domain::entity::device_session::DeviceSession;
use crate::domain::repository::AuthStore;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Value of `Authorization: <scheme> <value>`
fn authorization<'a>(headers: &'a HeaderMap, scheme: &str) -> Option<&'a str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (given, rest) = value.split_once(' ')?;
    given.eq_ignore_ascii_case(scheme).then(|| rest.trim())
}

fn bearer_user(parts: &Parts, tokens: &TokenService) -> Option<UserId> {
    let token = authorization(&parts.headers, "Bearer")?;
    tokens
        .verify_access(token, kernel::time::now())
        .ok()
        .map(|claims| claims.user_id)
}

/// Bearer-authenticated user; 401 otherwise
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);
        bearer_user(parts, &tokens)
            .map(CurrentUser)
            .ok_or(AuthError::Unauthorized)
    }
}

/// Bearer user when a valid token is present, anonymous otherwise
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<UserId>);

impl<S> FromRequestParts<S> for MaybeUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);
        Ok(MaybeUser(bearer_user(parts, &tokens)))
    }
}

/// HTTP Basic administrator
#[derive(Debug, Clone, Copy)]
pub struct SuperAdmin;

fn basic_matches(headers: &HeaderMap, admin: &AdminCredentials) -> bool {
    let Some(encoded) = authorization(headers, "Basic") else {
        return false;
    };
    let Ok(decoded) = from_base64(encoded) else {
        return false;
    };
    let expected = format!("{}:{}", admin.login, admin.password);
    constant_time_eq(&decoded, expected.as_bytes())
}

impl<S> FromRequestParts<S> for SuperAdmin
where
    Arc<AdminCredentials>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let admin = Arc::<AdminCredentials>::from_ref(state);
        if basic_matches(&parts.headers, &admin) {
            Ok(SuperAdmin)
        } else {
            tracing::warn!("Rejected admin credentials");
            Err(AuthError::Unauthorized)
        }
    }
}

/// Device session named by a live `refreshToken` cookie
#[derive(Debug, Clone)]
pub struct RefreshSession(pub DeviceSession);

impl<R: AuthStore> FromRequestParts<AuthAppState<R>> for RefreshSession {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AuthAppState<R>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_cookie(&parts.headers, &state.config.refresh_cookie().name)
            .ok_or(AuthError::Unauthorized)?;
        let session = AuthenticateRefreshUseCase::new(state.repo.clone(), state.tokens.clone())
            .execute(&token)
            .await?;
        Ok(RefreshSession(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use platform::crypto::to_base64;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_basic_admin() {
        let admin = AdminCredentials::default();
        let good = format!("Basic {}", to_base64(b"admin:qwerty"));
        let bad = format!("Basic {}", to_base64(b"admin:wrong"));

        assert!(basic_matches(&headers(&good), &admin));
        assert!(!basic_matches(&headers(&bad), &admin));
        assert!(!basic_matches(&headers("Bearer abc"), &admin));
        assert!(!basic_matches(&headers("Basic %%%"), &admin));
        assert!(!basic_matches(&HeaderMap::new(), &admin));
    }

    #[test]
    fn test_authorization_scheme() {
        assert_eq!(authorization(&headers("Bearer abc"), "Bearer"), Some("abc"));
        assert_eq!(authorization(&headers("bearer abc"), "Bearer"), Some("abc"));
        assert_eq!(authorization(&headers("Bearerabc"), "Bearer"), None);
        assert_eq!(authorization(&headers("Basic abc"), "Bearer"), None);
    }
}
