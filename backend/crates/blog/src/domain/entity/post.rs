//! Post Entity

use chrono::{DateTime, Utc};
use kernel::id::{BlogId, PostId};

use crate::domain::entity::blog::Blog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub short_description: String,
    pub content: String,
    pub blog_id: BlogId,
    /// Copied from the blog when the post is written
    pub blog_name: String,
    pub created_at: DateTime<Utc>,
}

/// Editable post fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    pub title: String,
    pub short_description: String,
    pub content: String,
}

impl Post {
    pub fn new(input: PostInput, blog: &Blog, now: DateTime<Utc>) -> Self {
        Self {
            id: PostId::new(),
            title: input.title,
            short_description: input.short_description,
            content: input.content,
            blog_id: blog.id,
            blog_name: blog.name.clone(),
            created_at: now,
        }
    }

    /// Overwrite the text and move the post under `blog`
    pub fn apply(&mut self, input: PostInput, blog: &Blog) {
        self.title = input.title;
        self.short_description = input.short_description;
        self.content = input.content;
        self.blog_id = blog.id;
        self.blog_name = blog.name.clone();
    }
}
