//! Entity Module

pub mod blog;
pub mod comment;
pub mod post;
pub mod reaction;
