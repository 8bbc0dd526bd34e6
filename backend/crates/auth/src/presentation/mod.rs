//! Presentation Layer
//!
//! HTTP handlers, DTOs, request guards and routers.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod router;

pub use extract::{CurrentUser, MaybeUser, RefreshSession, SuperAdmin};
pub use handlers::AuthAppState;
pub use router::{auth_router, devices_router, users_router};
