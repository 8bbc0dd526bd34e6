//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Common error types and result aliases
//! - Typed entity ids
//! - Pagination and field validation shared by every collection endpoint
//! - Timestamp formatting
//!
//! **Design Principle**: Only include things that have consistent meaning
//! across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
pub mod pagination;
pub mod time;
pub mod validation;
