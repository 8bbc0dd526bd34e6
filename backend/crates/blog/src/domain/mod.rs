//! Domain Layer
//!
//! Entities and repository traits for blogs, posts, comments and reactions.

pub mod entity;
pub mod repository;

pub use entity::{blog::Blog, comment::Comment, post::Post, reaction::Reaction};
pub use repository::{
    BlogRepository, BlogStore, CommentRepository, PostRepository, ReactionRepository,
    UserDirectory, UserLookup,
};
