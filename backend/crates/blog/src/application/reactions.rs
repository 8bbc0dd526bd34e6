//! Reaction Use Cases
//!
//! Like / dislike bookkeeping shared by posts and comments.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::reaction::{LikeStatus, Reaction, ReactionTarget};
use crate::domain::repository::{
    BlogStore, CommentRepository, PostRepository, ReactionRepository, UserDirectory,
    UserLookup,
};
use crate::error::{BlogError, BlogResult};

/// How many likes a post shows in `newestLikes`
pub const NEWEST_LIKES_LIMIT: usize = 3;

/// Counts plus the viewer's own status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LikesInfo {
    pub likes_count: u64,
    pub dislikes_count: u64,
    pub my_status: LikeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtendedLikesInfo {
    pub likes: LikesInfo,
    /// Most recent first
    pub newest_likes: Vec<Reaction>,
}

pub(crate) async fn likes_info<R: ReactionRepository>(
    repo: &R,
    target: &ReactionTarget,
    viewer: Option<&UserId>,
) -> BlogResult<LikesInfo> {
    let counts = repo.count_reactions(target).await?;
    let my_status = match viewer {
        Some(user_id) => repo
            .find_reaction(target, user_id)
            .await?
            .map(|r| r.status)
            .unwrap_or_default(),
        None => LikeStatus::None,
    };
    Ok(LikesInfo {
        likes_count: counts.likes,
        dislikes_count: counts.dislikes,
        my_status,
    })
}

pub(crate) async fn extended_likes_info<R: ReactionRepository>(
    repo: &R,
    target: &ReactionTarget,
    viewer: Option<&UserId>,
) -> BlogResult<ExtendedLikesInfo> {
    let likes = likes_info(repo, target, viewer).await?;
    let newest_likes = repo.newest_likes(target, NEWEST_LIKES_LIMIT).await?;
    Ok(ExtendedLikesInfo {
        likes,
        newest_likes,
    })
}

/// PUT `.../like-status`
pub struct SetReactionUseCase<B: BlogStore, U: UserLookup> {
    repo: Arc<B>,
    users: Arc<U>,
}

impl<B: BlogStore, U: UserLookup> SetReactionUseCase<B, U> {
    pub fn new(repo: Arc<B>, users: Arc<U>) -> Self {
        Self { repo, users }
    }

    /// `None` removes the reaction; repeating the current status changes nothing
    pub async fn execute(
        &self,
        target: ReactionTarget,
        user_id: UserId,
        status: LikeStatus,
    ) -> BlogResult<()> {
        self.ensure_target_exists(&target).await?;

        let existing = self.repo.find_reaction(&target, &user_id).await?;
        let current = existing.as_ref().map(|r| r.status).unwrap_or_default();
        if current == status {
            return Ok(());
        }

        if status == LikeStatus::None {
            self.repo.delete_reaction(&target, &user_id).await?;
            tracing::debug!(kind = target.kind(), id = %target.id(), user_id = %user_id, "Reaction removed");
            return Ok(());
        }

        let user_login = self
            .users
            .login_of(&user_id)
            .await?
            .ok_or(BlogError::Unauthorized)?;
        let reaction = Reaction {
            target,
            user_id,
            user_login,
            status,
            added_at: kernel::time::now(),
        };
        self.repo.save_reaction(&reaction).await?;

        tracing::debug!(
            kind = target.kind(),
            id = %target.id(),
            user_id = %user_id,
            status = status.as_str(),
            "Reaction saved"
        );
        Ok(())
    }

    async fn ensure_target_exists(&self, target: &ReactionTarget) -> BlogResult<()> {
        match target {
            ReactionTarget::Post(id) => {
                self.repo.find_post(id).await?.ok_or(BlogError::PostNotFound)?;
            }
            ReactionTarget::Comment(id) => {
                self.repo
                    .find_comment(id)
                    .await?
                    .ok_or(BlogError::CommentNotFound)?;
            }
        }
        Ok(())
    }
}
