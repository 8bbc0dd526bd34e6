//! Refresh Session Use Cases
//!
//! Checking a refresh token against its device session, rotating it and
//! logging out.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::tokens::{TokenPair, TokenService};
use crate::domain::entity::device_session::DeviceSession;
use crate::domain::repository::{AuthStore, DeviceSessionRepository};
use crate::error::{AuthError, AuthResult};

/// Resolves a refresh token to its live device session
pub struct AuthenticateRefreshUseCase<R: AuthStore> {
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R: AuthStore> AuthenticateRefreshUseCase<R> {
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    /// The token must verify and name the session's user, device and
    /// current token id
    pub async fn execute(&self, refresh_token: &str) -> AuthResult<DeviceSession> {
        let now = kernel::time::now();
        let claims = self
            .tokens
            .verify_refresh(refresh_token, now)
            .map_err(|_| AuthError::Unauthorized)?;

        let session = self
            .repo
            .find_session(&claims.device_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if session.user_id != claims.user_id || !session.is_current(&claims.token_id, now) {
            tracing::warn!(device_id = %claims.device_id, "Stale or foreign refresh token");
            return Err(AuthError::Unauthorized);
        }
        Ok(session)
    }
}

/// Rotates the device session and issues a new token pair
pub struct RefreshTokensUseCase<R: AuthStore> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    tokens: Arc<TokenService>,
}

impl<R: AuthStore> RefreshTokensUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, tokens: Arc<TokenService>) -> Self {
        Self {
            repo,
            config,
            tokens,
        }
    }

    pub async fn execute(&self, mut session: DeviceSession) -> AuthResult<TokenPair> {
        let previous = session.rotate(kernel::time::now(), self.config.session_ttl());
        if !self.repo.replace_session_token(&session, &previous).await? {
            return Err(AuthError::Unauthorized);
        }

        tracing::debug!(device_id = %session.device_id, "Refresh token rotated");
        Ok(self.tokens.issue_pair(&session)?)
    }
}

pub struct LogoutUseCase<R: AuthStore> {
    repo: Arc<R>,
}

impl<R: AuthStore> LogoutUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, session: DeviceSession) -> AuthResult<()> {
        self.repo.delete_session(&session.device_id).await?;
        tracing::info!(user_id = %session.user_id, device_id = %session.device_id, "User logged out");
        Ok(())
    }
}
