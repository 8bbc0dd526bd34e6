//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{device_session::DeviceSession, user::User};
pub use repository::{AuthStore, DeviceSessionRepository, UserRepository};
