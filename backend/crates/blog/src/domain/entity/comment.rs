//! Comment Entity

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, PostId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentatorInfo {
    pub user_id: UserId,
    pub user_login: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub content: String,
    pub commentator: CommentatorInfo,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        post_id: PostId,
        content: String,
        commentator: CommentatorInfo,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CommentId::new(),
            post_id,
            content,
            commentator,
            created_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.commentator.user_id == *user_id
    }
}
