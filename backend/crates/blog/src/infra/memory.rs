//! In-memory Repository Implementations
//!
//! Used when no database is configured, and by tests.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::{BlogId, CommentId, PostId, UserId};
use kernel::pagination::{PageQuery, contains_ignore_case};
use tokio::sync::RwLock;

use crate::domain::entity::{
    blog::Blog,
    comment::Comment,
    post::Post,
    reaction::{LikeStatus, Reaction, ReactionCounts, ReactionTarget},
};
use crate::domain::repository::{
    BlogRepository, BlogSortBy, CommentRepository, CommentSortBy, PostRepository, PostSortBy,
    ReactionRepository,
};
use crate::error::BlogResult;

#[derive(Debug, Clone, Default)]
pub struct InMemoryBlogRepository {
    blogs: Arc<RwLock<HashMap<BlogId, Blog>>>,
    posts: Arc<RwLock<HashMap<PostId, Post>>>,
    comments: Arc<RwLock<HashMap<CommentId, Comment>>>,
    reactions: Arc<RwLock<HashMap<(ReactionTarget, UserId), Reaction>>>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Sort, then cut out the requested page
fn page<T, F: Copy>(
    mut items: Vec<T>,
    query: &PageQuery<F>,
    compare: impl Fn(&T, &T, F) -> Ordering,
) -> (Vec<T>, u64) {
    items.sort_by(|a, b| query.sort_direction.apply(compare(a, b, query.sort_by)));
    let total = items.len() as u64;
    (query.window(items), total)
}

fn compare_blogs(a: &Blog, b: &Blog, sort_by: BlogSortBy) -> Ordering {
    let by_key = match sort_by {
        BlogSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
        BlogSortBy::Name => a.name.cmp(&b.name),
        BlogSortBy::Description => a.description.cmp(&b.description),
        BlogSortBy::WebsiteUrl => a.website_url.cmp(&b.website_url),
        BlogSortBy::IsMembership => a.is_membership.cmp(&b.is_membership),
    };
    by_key.then_with(|| a.id.cmp(&b.id))
}

fn compare_posts(a: &Post, b: &Post, sort_by: PostSortBy) -> Ordering {
    let by_key = match sort_by {
        PostSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
        PostSortBy::Title => a.title.cmp(&b.title),
        PostSortBy::ShortDescription => a.short_description.cmp(&b.short_description),
        PostSortBy::Content => a.content.cmp(&b.content),
        PostSortBy::BlogId => a.blog_id.cmp(&b.blog_id),
        PostSortBy::BlogName => a.blog_name.cmp(&b.blog_name),
    };
    by_key.then_with(|| a.id.cmp(&b.id))
}

fn compare_comments(a: &Comment, b: &Comment, sort_by: CommentSortBy) -> Ordering {
    let by_key = match sort_by {
        CommentSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
        CommentSortBy::Content => a.content.cmp(&b.content),
    };
    by_key.then_with(|| a.id.cmp(&b.id))
}

// ============================================================================
// Blogs
// ============================================================================

impl BlogRepository for InMemoryBlogRepository {
    async fn insert_blog(&self, blog: &Blog) -> BlogResult<()> {
        self.blogs.write().await.insert(blog.id, blog.clone());
        Ok(())
    }

    async fn find_blog(&self, id: &BlogId) -> BlogResult<Option<Blog>> {
        Ok(self.blogs.read().await.get(id).cloned())
    }

    async fn list_blogs(
        &self,
        name_term: Option<&str>,
        query: &PageQuery<BlogSortBy>,
    ) -> BlogResult<(Vec<Blog>, u64)> {
        let matched: Vec<Blog> = self
            .blogs
            .read()
            .await
            .values()
            .filter(|b| name_term.is_none_or(|term| contains_ignore_case(&b.name, term)))
            .cloned()
            .collect();
        Ok(page(matched, query, compare_blogs))
    }

    async fn update_blog(&self, blog: &Blog) -> BlogResult<bool> {
        match self.blogs.write().await.get_mut(&blog.id) {
            Some(stored) => {
                *stored = blog.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_blog(&self, id: &BlogId) -> BlogResult<bool> {
        Ok(self.blogs.write().await.remove(id).is_some())
    }

    async fn clear_blogs(&self) -> BlogResult<()> {
        self.blogs.write().await.clear();
        Ok(())
    }
}

// ============================================================================
// Posts
// ============================================================================

impl PostRepository for InMemoryBlogRepository {
    async fn insert_post(&self, post: &Post) -> BlogResult<()> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(())
    }

    async fn find_post(&self, id: &PostId) -> BlogResult<Option<Post>> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn list_posts(
        &self,
        blog_id: Option<&BlogId>,
        query: &PageQuery<PostSortBy>,
    ) -> BlogResult<(Vec<Post>, u64)> {
        let matched: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| blog_id.is_none_or(|id| p.blog_id == *id))
            .cloned()
            .collect();
        Ok(page(matched, query, compare_posts))
    }

    async fn update_post(&self, post: &Post) -> BlogResult<bool> {
        match self.posts.write().await.get_mut(&post.id) {
            Some(stored) => {
                *stored = post.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_post(&self, id: &PostId) -> BlogResult<bool> {
        Ok(self.posts.write().await.remove(id).is_some())
    }

    async fn clear_posts(&self) -> BlogResult<()> {
        self.posts.write().await.clear();
        Ok(())
    }
}

// ============================================================================
// Comments
// ============================================================================

impl CommentRepository for InMemoryBlogRepository {
    async fn insert_comment(&self, comment: &Comment) -> BlogResult<()> {
        self.comments.write().await.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn find_comment(&self, id: &CommentId) -> BlogResult<Option<Comment>> {
        Ok(self.comments.read().await.get(id).cloned())
    }

    async fn list_comments(
        &self,
        post_id: &PostId,
        query: &PageQuery<CommentSortBy>,
    ) -> BlogResult<(Vec<Comment>, u64)> {
        let matched: Vec<Comment> = self
            .comments
            .read()
            .await
            .values()
            .filter(|c| c.post_id == *post_id)
            .cloned()
            .collect();
        Ok(page(matched, query, compare_comments))
    }

    async fn update_comment(&self, comment: &Comment) -> BlogResult<bool> {
        match self.comments.write().await.get_mut(&comment.id) {
            Some(stored) => {
                *stored = comment.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_comment(&self, id: &CommentId) -> BlogResult<bool> {
        Ok(self.comments.write().await.remove(id).is_some())
    }

    async fn clear_comments(&self) -> BlogResult<()> {
        self.comments.write().await.clear();
        Ok(())
    }
}

// ============================================================================
// Reactions
// ============================================================================

impl ReactionRepository for InMemoryBlogRepository {
    async fn find_reaction(
        &self,
        target: &ReactionTarget,
        user_id: &UserId,
    ) -> BlogResult<Option<Reaction>> {
        Ok(self
            .reactions
            .read()
            .await
            .get(&(*target, *user_id))
            .cloned())
    }

    async fn save_reaction(&self, reaction: &Reaction) -> BlogResult<()> {
        self.reactions
            .write()
            .await
            .insert((reaction.target, reaction.user_id), reaction.clone());
        Ok(())
    }

    async fn delete_reaction(&self, target: &ReactionTarget, user_id: &UserId) -> BlogResult<bool> {
        Ok(self
            .reactions
            .write()
            .await
            .remove(&(*target, *user_id))
            .is_some())
    }

    async fn count_reactions(&self, target: &ReactionTarget) -> BlogResult<ReactionCounts> {
        let reactions = self.reactions.read().await;
        let mut counts = ReactionCounts::default();
        for reaction in reactions.values().filter(|r| r.target == *target) {
            match reaction.status {
                LikeStatus::Like => counts.likes += 1,
                LikeStatus::Dislike => counts.dislikes += 1,
                LikeStatus::None => {}
            }
        }
        Ok(counts)
    }

    async fn newest_likes(&self, target: &ReactionTarget, limit: usize) -> BlogResult<Vec<Reaction>> {
        let mut likes: Vec<Reaction> = self
            .reactions
            .read()
            .await
            .values()
            .filter(|r| r.target == *target && r.status == LikeStatus::Like)
            .cloned()
            .collect();
        likes.sort_by(|a, b| {
            b.added_at
                .cmp(&a.added_at)
                .then_with(|| b.user_id.cmp(&a.user_id))
        });
        likes.truncate(limit);
        Ok(likes)
    }

    async fn clear_reactions(&self) -> BlogResult<()> {
        self.reactions.write().await.clear();
        Ok(())
    }
}
