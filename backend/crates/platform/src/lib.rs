//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, Base64, constant-time compare)
//! - HS256 JSON Web Tokens
//! - Password hashing (Argon2id)
//! - Cookie management
//! - Client identification (IP, device title)
//! - Sliding-window rate limiting
//! - Transactional email

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod jwt;
pub mod mail;
pub mod password;
pub mod rate_limit;
