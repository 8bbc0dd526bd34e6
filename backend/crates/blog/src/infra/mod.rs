//! Infrastructure Layer
//!
//! Repository implementations and the user lookup adapter.

pub mod memory;
pub mod postgres;
pub mod users;

pub use memory::InMemoryBlogRepository;
pub use postgres::PgBlogRepository;
