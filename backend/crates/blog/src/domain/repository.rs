//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{BlogId, CommentId, PostId, UserId};
use kernel::pagination::{PageQuery, SortField};

use crate::domain::entity::{
    blog::Blog,
    comment::Comment,
    post::Post,
    reaction::{Reaction, ReactionCounts, ReactionTarget},
};
use crate::error::BlogResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogSortBy {
    #[default]
    CreatedAt,
    Name,
    Description,
    WebsiteUrl,
    IsMembership,
}

impl SortField for BlogSortBy {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "createdAt" => Some(BlogSortBy::CreatedAt),
            "name" => Some(BlogSortBy::Name),
            "description" => Some(BlogSortBy::Description),
            "websiteUrl" => Some(BlogSortBy::WebsiteUrl),
            "isMembership" => Some(BlogSortBy::IsMembership),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSortBy {
    #[default]
    CreatedAt,
    Title,
    ShortDescription,
    Content,
    BlogId,
    BlogName,
}

impl SortField for PostSortBy {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "createdAt" => Some(PostSortBy::CreatedAt),
            "title" => Some(PostSortBy::Title),
            "shortDescription" => Some(PostSortBy::ShortDescription),
            "content" => Some(PostSortBy::Content),
            "blogId" => Some(PostSortBy::BlogId),
            "blogName" => Some(PostSortBy::BlogName),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentSortBy {
    #[default]
    CreatedAt,
    Content,
}

impl SortField for CommentSortBy {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "createdAt" => Some(CommentSortBy::CreatedAt),
            "content" => Some(CommentSortBy::Content),
            _ => None,
        }
    }
}

#[trait_variant::make(BlogRepository: Send)]
pub trait LocalBlogRepository {
    async fn insert_blog(&self, blog: &Blog) -> BlogResult<()>;

    async fn find_blog(&self, id: &BlogId) -> BlogResult<Option<Blog>>;

    /// `name_term` is a case-insensitive substring of the name
    async fn list_blogs(
        &self,
        name_term: Option<&str>,
        query: &PageQuery<BlogSortBy>,
    ) -> BlogResult<(Vec<Blog>, u64)>;

    /// `false` if no such blog
    async fn update_blog(&self, blog: &Blog) -> BlogResult<bool>;

    async fn delete_blog(&self, id: &BlogId) -> BlogResult<bool>;

    async fn clear_blogs(&self) -> BlogResult<()>;
}

#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    async fn insert_post(&self, post: &Post) -> BlogResult<()>;

    async fn find_post(&self, id: &PostId) -> BlogResult<Option<Post>>;

    /// All posts, or only those of `blog_id`
    async fn list_posts(
        &self,
        blog_id: Option<&BlogId>,
        query: &PageQuery<PostSortBy>,
    ) -> BlogResult<(Vec<Post>, u64)>;

    async fn update_post(&self, post: &Post) -> BlogResult<bool>;

    async fn delete_post(&self, id: &PostId) -> BlogResult<bool>;

    async fn clear_posts(&self) -> BlogResult<()>;
}

#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    async fn insert_comment(&self, comment: &Comment) -> BlogResult<()>;

    async fn find_comment(&self, id: &CommentId) -> BlogResult<Option<Comment>>;

    async fn list_comments(
        &self,
        post_id: &PostId,
        query: &PageQuery<CommentSortBy>,
    ) -> BlogResult<(Vec<Comment>, u64)>;

    async fn update_comment(&self, comment: &Comment) -> BlogResult<bool>;

    async fn delete_comment(&self, id: &CommentId) -> BlogResult<bool>;

    async fn clear_comments(&self) -> BlogResult<()>;
}

#[trait_variant::make(ReactionRepository: Send)]
pub trait LocalReactionRepository {
    async fn find_reaction(
        &self,
        target: &ReactionTarget,
        user_id: &UserId,
    ) -> BlogResult<Option<Reaction>>;

    /// Insert or replace the user's reaction on the target
    async fn save_reaction(&self, reaction: &Reaction) -> BlogResult<()>;

    async fn delete_reaction(&self, target: &ReactionTarget, user_id: &UserId) -> BlogResult<bool>;

    async fn count_reactions(&self, target: &ReactionTarget) -> BlogResult<ReactionCounts>;

    /// Most recent likes first
    async fn newest_likes(&self, target: &ReactionTarget, limit: usize) -> BlogResult<Vec<Reaction>>;

    async fn clear_reactions(&self) -> BlogResult<()>;
}

/// Everything the blog use cases need from storage
pub trait BlogStore:
    BlogRepository
    + PostRepository
    + CommentRepository
    + ReactionRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> BlogStore for T where
    T: BlogRepository
        + PostRepository
        + CommentRepository
        + ReactionRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}

/// Read access to user accounts owned by the auth module
#[trait_variant::make(UserDirectory: Send)]
pub trait LocalUserDirectory {
    /// Current login of the user, `None` if the account is gone
    async fn login_of(&self, user_id: &UserId) -> BlogResult<Option<String>>;
}

/// A [`UserDirectory`] that can be shared across request handlers
pub trait UserLookup: UserDirectory + Send + Sync + 'static {}

impl<T: UserDirectory + Send + Sync + 'static> UserLookup for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_whitelists() {
        assert_eq!(BlogSortBy::parse("websiteUrl"), Some(BlogSortBy::WebsiteUrl));
        assert_eq!(BlogSortBy::parse("id"), None);
        assert_eq!(PostSortBy::parse("blogName"), Some(PostSortBy::BlogName));
        assert_eq!(PostSortBy::parse("likesCount"), None);
        assert_eq!(CommentSortBy::parse("content"), Some(CommentSortBy::Content));
        assert_eq!(CommentSortBy::parse("commentatorInfo"), None);
    }
}
