//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::jwt::JwtError;
use platform::password::PasswordHashError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Already-shaped application error (e.g. input validation)
    #[error(transparent)]
    App(#[from] AppError),

    /// Unknown login/email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, invalid, expired or superseded token
    #[error("Unauthorized")]
    Unauthorized,

    #[error("login should be unique")]
    LoginTaken,

    #[error("email should be unique")]
    EmailTaken,

    #[error("confirmation code is invalid or expired")]
    InvalidConfirmationCode,

    #[error("user with this email does not exist")]
    EmailNotFound,

    #[error("email has already been confirmed")]
    EmailAlreadyConfirmed,

    #[error("recovery code is invalid or expired")]
    InvalidRecoveryCode,

    #[error("User not found")]
    UserNotFound,

    #[error("Device not found")]
    DeviceNotFound,

    /// Device belongs to another user
    #[error("Device belongs to another user")]
    DeviceForbidden,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password hashing error: {0}")]
    Password(#[from] PasswordHashError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::App(e) => e.kind(),
            AuthError::InvalidCredentials | AuthError::Unauthorized => ErrorKind::Unauthorized,
            AuthError::LoginTaken
            | AuthError::EmailTaken
            | AuthError::InvalidConfirmationCode
            | AuthError::EmailNotFound
            | AuthError::EmailAlreadyConfirmed
            | AuthError::InvalidRecoveryCode => ErrorKind::BadRequest,
            AuthError::UserNotFound | AuthError::DeviceNotFound => ErrorKind::NotFound,
            AuthError::DeviceForbidden => ErrorKind::Forbidden,
            AuthError::Token(_) | AuthError::Password(_) | AuthError::Database(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Field reported to the client for field-level failures
    fn field(&self) -> Option<&'static str> {
        match self {
            AuthError::LoginTaken => Some("login"),
            AuthError::EmailTaken | AuthError::EmailNotFound | AuthError::EmailAlreadyConfirmed => {
                Some("email")
            }
            AuthError::InvalidConfirmationCode => Some("code"),
            AuthError::InvalidRecoveryCode => Some("recoveryCode"),
            _ => None,
        }
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        let kind = self.kind();
        match self {
            AuthError::App(e) => e,
            other => match other.field() {
                Some(field) => AppError::field(kind, field, &other.to_string()),
                None => AppError::new(kind, other.to_string()),
            },
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Token(e) => {
                tracing::error!(error = %e, "Token encoding error");
            }
            AuthError::Password(e) => {
                tracing::error!(error = %e, "Password hashing error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::DeviceForbidden => {
                tracing::warn!("Attempt to terminate a foreign device session");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors() {
        let err = AuthError::LoginTaken.into_app_error();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.field_errors()[0].field, "login");
        assert_eq!(err.field_errors()[0].message, "login should be unique");

        let err = AuthError::InvalidRecoveryCode.into_app_error();
        assert_eq!(err.field_errors()[0].field, "recoveryCode");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.kind().status_code(), 401);
        assert_eq!(AuthError::Unauthorized.kind().status_code(), 401);
        assert_eq!(AuthError::DeviceNotFound.kind().status_code(), 404);
        assert_eq!(AuthError::DeviceForbidden.kind().status_code(), 403);
        assert_eq!(AuthError::UserNotFound.kind().status_code(), 404);
    }

    #[test]
    fn test_plain_errors_have_no_fields() {
        let err = AuthError::Unauthorized.into_app_error();
        assert!(err.field_errors().is_empty());
    }

    #[test]
    fn test_app_error_passes_through() {
        let app = AppError::not_found("Blog not found");
        let err: AuthError = app.into();
        assert_eq!(err.into_app_error().status_code(), 404);
    }
}
