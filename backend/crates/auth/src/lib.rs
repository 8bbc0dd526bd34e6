//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - PostgreSQL and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, guards, routers
//!
//! ## Features
//! - Registration with email confirmation, password recovery
//! - Login by login or email; access token plus rotating refresh cookie
//! - One device session per login, listed and terminated under `/security/devices`
//! - Administrator user management behind HTTP Basic
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - HS256 access (10 min) and refresh (20 s) tokens
//! - A refresh token is valid only while its id is the device's current one

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AdminCredentials, AuthConfig};
pub use application::tokens::TokenService;
pub use domain::repository::AuthStore;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryAuthRepository, PgAuthRepository};
pub use presentation::handlers::AuthAppState;
pub use presentation::router::{auth_router, devices_router, users_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod guards {
    pub use crate::presentation::extract::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
}
