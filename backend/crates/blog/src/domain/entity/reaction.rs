//! Reaction Entity
//!
//! One like or dislike per (target, user).

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, PostId, UserId};
use serde::{Deserialize, Serialize};

/// `Like | Dislike | None`; `None` means no reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LikeStatus {
    #[default]
    None,
    Like,
    Dislike,
}

impl LikeStatus {
    pub const VALUES: [&'static str; 3] = ["None", "Like", "Dislike"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "None" => Some(LikeStatus::None),
            "Like" => Some(LikeStatus::Like),
            "Dislike" => Some(LikeStatus::Dislike),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LikeStatus::None => "None",
            LikeStatus::Like => "Like",
            LikeStatus::Dislike => "Dislike",
        }
    }
}

/// What a reaction is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionTarget {
    Post(PostId),
    Comment(CommentId),
}

impl ReactionTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            ReactionTarget::Post(_) => "post",
            ReactionTarget::Comment(_) => "comment",
        }
    }

    pub fn id(&self) -> String {
        match self {
            ReactionTarget::Post(id) => id.to_string(),
            ReactionTarget::Comment(id) => id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub target: ReactionTarget,
    pub user_id: UserId,
    /// Login at the time of reacting, shown in `newestLikes`
    pub user_login: String,
    /// Never `LikeStatus::None` for a stored reaction
    pub status: LikeStatus,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReactionCounts {
    pub likes: u64,
    pub dislikes: u64,
}
