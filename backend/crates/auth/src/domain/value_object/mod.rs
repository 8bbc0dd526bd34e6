//! Value Object Module

pub mod email;
pub mod expiring_code;
pub mod login;
