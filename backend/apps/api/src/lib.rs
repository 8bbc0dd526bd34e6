//! Blogger Platform API
//!
//! Assembles the auth and blog routers into one application. The binary in
//! `main.rs` chooses the storage backend and adds the HTTP layers.

pub mod app;
pub mod config;
pub mod testing;

pub use app::build_app;
pub use config::ApiConfig;
