//! Comment Use Cases
//!
//! Comments hang off a post. Only the author may edit or delete one.

use std::sync::Arc;

use kernel::id::{CommentId, PostId, UserId};
use kernel::pagination::{PageQuery, Paginator};

use crate::application::reactions::{LikesInfo, likes_info};
use crate::domain::entity::comment::{Comment, CommentatorInfo};
use crate::domain::entity::reaction::ReactionTarget;
use crate::domain::repository::{
    BlogStore, CommentRepository, CommentSortBy, PostRepository, UserDirectory, UserLookup,
};
use crate::error::{BlogError, BlogResult};

/// A comment as seen by one viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDetails {
    pub comment: Comment,
    pub likes: LikesInfo,
}

async fn comment_details<B: BlogStore>(
    repo: &B,
    comment: Comment,
    viewer: Option<&UserId>,
) -> BlogResult<CommentDetails> {
    let likes = likes_info(repo, &ReactionTarget::Comment(comment.id), viewer).await?;
    Ok(CommentDetails { comment, likes })
}

pub struct CreateCommentUseCase<B: BlogStore, U: UserLookup> {
    repo: Arc<B>,
    users: Arc<U>,
}

impl<B: BlogStore, U: UserLookup> CreateCommentUseCase<B, U> {
    pub fn new(repo: Arc<B>, users: Arc<U>) -> Self {
        Self { repo, users }
    }

    /// The author's login is captured at creation time
    pub async fn execute(
        &self,
        post_id: PostId,
        user_id: UserId,
        content: String,
    ) -> BlogResult<CommentDetails> {
        self.repo
            .find_post(&post_id)
            .await?
            .ok_or(BlogError::PostNotFound)?;
        let user_login = self
            .users
            .login_of(&user_id)
            .await?
            .ok_or(BlogError::Unauthorized)?;

        let comment = Comment::new(
            post_id,
            content,
            CommentatorInfo {
                user_id,
                user_login,
            },
            kernel::time::now(),
        );
        self.repo.insert_comment(&comment).await?;

        tracing::info!(comment_id = %comment.id, post_id = %post_id, user_id = %user_id, "Comment created");
        Ok(CommentDetails {
            comment,
            likes: LikesInfo::default(),
        })
    }
}

pub struct GetCommentUseCase<B: BlogStore> {
    repo: Arc<B>,
}

impl<B: BlogStore> GetCommentUseCase<B> {
    pub fn new(repo: Arc<B>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        id: CommentId,
        viewer: Option<UserId>,
    ) -> BlogResult<CommentDetails> {
        let comment = self
            .repo
            .find_comment(&id)
            .await?
            .ok_or(BlogError::CommentNotFound)?;
        comment_details(self.repo.as_ref(), comment, viewer.as_ref()).await
    }
}

pub struct ListCommentsUseCase<B: BlogStore> {
    repo: Arc<B>,
}

impl<B: BlogStore> ListCommentsUseCase<B> {
    pub fn new(repo: Arc<B>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        post_id: PostId,
        query: PageQuery<CommentSortBy>,
        viewer: Option<UserId>,
    ) -> BlogResult<Paginator<CommentDetails>> {
        self.repo
            .find_post(&post_id)
            .await?
            .ok_or(BlogError::PostNotFound)?;

        let (comments, total) = self.repo.list_comments(&post_id, &query).await?;
        let mut items = Vec::with_capacity(comments.len());
        for comment in comments {
            items.push(comment_details(self.repo.as_ref(), comment, viewer.as_ref()).await?);
        }
        Ok(Paginator::new(&query, total, items))
    }
}

/// Load a comment and make sure `user_id` wrote it
async fn owned_comment<B: BlogStore>(
    repo: &B,
    id: &CommentId,
    user_id: &UserId,
) -> BlogResult<Comment> {
    let comment = repo
        .find_comment(id)
        .await?
        .ok_or(BlogError::CommentNotFound)?;
    if !comment.is_owned_by(user_id) {
        return Err(BlogError::NotCommentOwner);
    }
    Ok(comment)
}

pub struct UpdateCommentUseCase<B: BlogStore> {
    repo: Arc<B>,
}

impl<B: BlogStore> UpdateCommentUseCase<B> {
    pub fn new(repo: Arc<B>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: CommentId, user_id: UserId, content: String) -> BlogResult<()> {
        let mut comment = owned_comment(self.repo.as_ref(), &id, &user_id).await?;
        comment.content = content;
        if !self.repo.update_comment(&comment).await? {
            return Err(BlogError::CommentNotFound);
        }
        tracing::info!(comment_id = %id, "Comment updated");
        Ok(())
    }
}

pub struct DeleteCommentUseCase<B: BlogStore> {
    repo: Arc<B>,
}

impl<B: BlogStore> DeleteCommentUseCase<B> {
    pub fn new(repo: Arc<B>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: CommentId, user_id: UserId) -> BlogResult<()> {
        owned_comment(self.repo.as_ref(), &id, &user_id).await?;
        if !self.repo.delete_comment(&id).await? {
            return Err(BlogError::CommentNotFound);
        }
        tracing::info!(comment_id = %id, "Comment deleted");
        Ok(())
    }
}
