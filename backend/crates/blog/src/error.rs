//! Blog Error Types
//!
//! Blog-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use auth::AuthError;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type BlogResult<T> = Result<T, BlogError>;

#[derive(Debug, Error)]
pub enum BlogError {
    /// Already-shaped application error (e.g. input validation)
    #[error(transparent)]
    App(#[from] AppError),

    /// Path blog id does not exist
    #[error("Blog not found")]
    BlogNotFound,

    /// `blogId` in a request body does not exist
    #[error("Blog not found")]
    BlogIdNotFound,

    #[error("Post not found")]
    PostNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("Comment belongs to another user")]
    NotCommentOwner,

    /// Token names a user that no longer exists
    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl BlogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BlogError::App(e) => e.kind(),
            BlogError::BlogNotFound
            | BlogError::BlogIdNotFound
            | BlogError::PostNotFound
            | BlogError::CommentNotFound => ErrorKind::NotFound,
            BlogError::NotCommentOwner => ErrorKind::Forbidden,
            BlogError::Unauthorized => ErrorKind::Unauthorized,
            BlogError::Auth(e) => e.kind(),
            BlogError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn into_app_error(self) -> AppError {
        let kind = self.kind();
        match self {
            BlogError::App(e) => e,
            BlogError::Auth(e) => e.into_app_error(),
            BlogError::BlogIdNotFound => AppError::field(kind, "blogId", "Blog not found"),
            other => AppError::new(kind, other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            BlogError::Database(e) => {
                tracing::error!(error = %e, "Blog database error");
            }
            BlogError::NotCommentOwner => {
                tracing::warn!("Attempt to modify a foreign comment");
            }
            BlogError::App(e) if e.is_server_error() => {
                tracing::error!(error = %e, "Blog internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Blog error");
            }
        }
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_id_not_found_carries_field() {
        let err = BlogError::BlogIdNotFound.into_app_error();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.field_errors()[0].field, "blogId");
        assert_eq!(err.field_errors()[0].message, "Blog not found");
    }

    #[test]
    fn test_plain_not_found_has_no_body_fields() {
        let err = BlogError::BlogNotFound.into_app_error();
        assert_eq!(err.status_code(), 404);
        assert!(err.field_errors().is_empty());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(BlogError::NotCommentOwner.kind().status_code(), 403);
        assert_eq!(BlogError::Unauthorized.kind().status_code(), 401);
        assert_eq!(BlogError::from(AuthError::Unauthorized).kind().status_code(), 401);
    }
}
