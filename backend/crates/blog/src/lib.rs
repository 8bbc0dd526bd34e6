//! Blog Backend Module
//!
//! Blogs, their posts, comments on posts, and like/dislike reactions on
//! posts and comments.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities and repository traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! Writes on blogs and posts require the HTTP Basic administrator;
//! comments and reactions require a bearer access token. Reads accept an
//! optional bearer token so that `myStatus` reflects the viewer.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use domain::repository::{BlogStore, UserDirectory, UserLookup};
pub use error::{BlogError, BlogResult};
pub use infra::{InMemoryBlogRepository, PgBlogRepository};
pub use presentation::handlers::BlogAppState;
pub use presentation::router::{blogs_router, comments_router, posts_router};
