//! Post Use Cases
//!
//! Posts are read together with their reaction summary for the viewer.

use std::sync::Arc;

use kernel::id::{BlogId, PostId, UserId};
use kernel::pagination::{PageQuery, Paginator};

use crate::application::reactions::{ExtendedLikesInfo, extended_likes_info};
use crate::domain::entity::blog::Blog;
use crate::domain::entity::post::{Post, PostInput};
use crate::domain::entity::reaction::ReactionTarget;
use crate::domain::repository::{BlogRepository, BlogStore, PostRepository, PostSortBy};
use crate::error::{BlogError, BlogResult};

/// A post as seen by one viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetails {
    pub post: Post,
    pub likes: ExtendedLikesInfo,
}

pub(crate) async fn post_details<B: BlogStore>(
    repo: &B,
    post: Post,
    viewer: Option<&UserId>,
) -> BlogResult<PostDetails> {
    let likes = extended_likes_info(repo, &ReactionTarget::Post(post.id), viewer).await?;
    Ok(PostDetails { post, likes })
}

pub struct CreatePostUseCase<B: BlogStore> {
    repo: Arc<B>,
}

impl<B: BlogStore> CreatePostUseCase<B> {
    pub fn new(repo: Arc<B>) -> Self {
        Self { repo }
    }

    /// POST /posts; an unknown `blogId` is reported on that field
    pub async fn execute(&self, blog_id: BlogId, input: PostInput) -> BlogResult<PostDetails> {
        let blog = self
            .repo
            .find_blog(&blog_id)
            .await?
            .ok_or(BlogError::BlogIdNotFound)?;
        self.create(&blog, input).await
    }

    /// POST /blogs/{blogId}/posts; an unknown blog is a plain 404
    pub async fn execute_in_blog(
        &self,
        blog_id: BlogId,
        input: PostInput,
    ) -> BlogResult<PostDetails> {
        let blog = self
            .repo
            .find_blog(&blog_id)
            .await?
            .ok_or(BlogError::BlogNotFound)?;
        self.create(&blog, input).await
    }

    async fn create(&self, blog: &Blog, input: PostInput) -> BlogResult<PostDetails> {
        let post = Post::new(input, blog, kernel::time::now());
        self.repo.insert_post(&post).await?;
        tracing::info!(post_id = %post.id, blog_id = %blog.id, "Post created");
        Ok(PostDetails {
            post,
            likes: ExtendedLikesInfo::default(),
        })
    }
}

pub struct GetPostUseCase<B: BlogStore> {
    repo: Arc<B>,
}

impl<B: BlogStore> GetPostUseCase<B> {
    pub fn new(repo: Arc<B>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: PostId, viewer: Option<UserId>) -> BlogResult<PostDetails> {
        let post = self
            .repo
            .find_post(&id)
            .await?
            .ok_or(BlogError::PostNotFound)?;
        post_details(self.repo.as_ref(), post, viewer.as_ref()).await
    }
}

pub struct ListPostsUseCase<B: BlogStore> {
    repo: Arc<B>,
}

impl<B: BlogStore> ListPostsUseCase<B> {
    pub fn new(repo: Arc<B>) -> Self {
        Self { repo }
    }

    /// All posts, or the posts of one existing blog
    pub async fn execute(
        &self,
        blog_id: Option<BlogId>,
        query: PageQuery<PostSortBy>,
        viewer: Option<UserId>,
    ) -> BlogResult<Paginator<PostDetails>> {
        if let Some(blog_id) = &blog_id {
            self.repo
                .find_blog(blog_id)
                .await?
                .ok_or(BlogError::BlogNotFound)?;
        }

        let (posts, total) = self.repo.list_posts(blog_id.as_ref(), &query).await?;
        let mut items = Vec::with_capacity(posts.len());
        for post in posts {
            items.push(post_details(self.repo.as_ref(), post, viewer.as_ref()).await?);
        }
        Ok(Paginator::new(&query, total, items))
    }
}

pub struct UpdatePostUseCase<B: BlogStore> {
    repo: Arc<B>,
}

impl<B: BlogStore> UpdatePostUseCase<B> {
    pub fn new(repo: Arc<B>) -> Self {
        Self { repo }
    }

    /// The post is looked up before the blog
    pub async fn execute(&self, id: PostId, blog_id: BlogId, input: PostInput) -> BlogResult<()> {
        let mut post = self
            .repo
            .find_post(&id)
            .await?
            .ok_or(BlogError::PostNotFound)?;
        let blog = self
            .repo
            .find_blog(&blog_id)
            .await?
            .ok_or(BlogError::BlogIdNotFound)?;

        post.apply(input, &blog);
        if !self.repo.update_post(&post).await? {
            return Err(BlogError::PostNotFound);
        }
        tracing::info!(post_id = %id, blog_id = %blog_id, "Post updated");
        Ok(())
    }
}

pub struct DeletePostUseCase<B: BlogStore> {
    repo: Arc<B>,
}

impl<B: BlogStore> DeletePostUseCase<B> {
    pub fn new(repo: Arc<B>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: PostId) -> BlogResult<()> {
        if !self.repo.delete_post(&id).await? {
            return Err(BlogError::PostNotFound);
        }
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{blog_input, post_input, seed_blog};
    use crate::infra::memory::InMemoryBlogRepository;
    use kernel::pagination::PageParams;

    #[tokio::test]
    async fn test_create_copies_blog_name() {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let blog = seed_blog(repo.as_ref(), "tech").await;

        let created = CreatePostUseCase::new(repo.clone())
            .execute(blog.id, post_input("hello"))
            .await
            .unwrap();
        assert_eq!(created.post.blog_name, "tech");
        assert_eq!(created.likes, ExtendedLikesInfo::default());

        let found = GetPostUseCase::new(repo)
            .execute(created.post.id, None)
            .await
            .unwrap();
        assert_eq!(found.post, created.post);
    }

    #[tokio::test]
    async fn test_create_with_unknown_blog() {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let use_case = CreatePostUseCase::new(repo);

        let err = use_case
            .execute(BlogId::new(), post_input("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::BlogIdNotFound));

        let err = use_case
            .execute_in_blog(BlogId::new(), post_input("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::BlogNotFound));
    }

    #[tokio::test]
    async fn test_list_by_blog() {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let first = seed_blog(repo.as_ref(), "first").await;
        let second = seed_blog(repo.as_ref(), "second").await;
        let create = CreatePostUseCase::new(repo.clone());
        create.execute(first.id, post_input("a")).await.unwrap();
        create.execute(first.id, post_input("b")).await.unwrap();
        create.execute(second.id, post_input("c")).await.unwrap();

        let list = ListPostsUseCase::new(repo.clone());
        let all = list
            .execute(None, PageParams::default().resolve(), None)
            .await
            .unwrap();
        assert_eq!(all.total_count, 3);

        let of_first = list
            .execute(Some(first.id), PageParams::default().resolve(), None)
            .await
            .unwrap();
        assert_eq!(of_first.total_count, 2);
        assert!(of_first.items.iter().all(|d| d.post.blog_id == first.id));

        let err = list
            .execute(Some(BlogId::new()), PageParams::default().resolve(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::BlogNotFound));
    }

    #[tokio::test]
    async fn test_update_moves_post_and_refreshes_blog_name() {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let first = seed_blog(repo.as_ref(), "first").await;
        let second = seed_blog(repo.as_ref(), "second").await;
        let created = CreatePostUseCase::new(repo.clone())
            .execute(first.id, post_input("a"))
            .await
            .unwrap();

        UpdatePostUseCase::new(repo.clone())
            .execute(created.post.id, second.id, post_input("b"))
            .await
            .unwrap();

        let found = GetPostUseCase::new(repo)
            .execute(created.post.id, None)
            .await
            .unwrap();
        assert_eq!(found.post.title, "b");
        assert_eq!(found.post.blog_id, second.id);
        assert_eq!(found.post.blog_name, "second");
    }

    #[tokio::test]
    async fn test_update_checks_post_before_blog() {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let update = UpdatePostUseCase::new(repo.clone());

        let err = update
            .execute(PostId::new(), BlogId::new(), post_input("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::PostNotFound));

        let blog = seed_blog(repo.as_ref(), "b").await;
        let created = CreatePostUseCase::new(repo.clone())
            .execute(blog.id, post_input("a"))
            .await
            .unwrap();
        let err = update
            .execute(created.post.id, BlogId::new(), post_input("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::BlogIdNotFound));
    }

    #[tokio::test]
    async fn test_blog_rename_keeps_post_blog_name() {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let blog = seed_blog(repo.as_ref(), "before").await;
        let created = CreatePostUseCase::new(repo.clone())
            .execute(blog.id, post_input("a"))
            .await
            .unwrap();

        crate::application::UpdateBlogUseCase::new(repo.clone())
            .execute(blog.id, blog_input("after"))
            .await
            .unwrap();

        let found = GetPostUseCase::new(repo)
            .execute(created.post.id, None)
            .await
            .unwrap();
        assert_eq!(found.post.blog_name, "before");
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let blog = seed_blog(repo.as_ref(), "b").await;
        let created = CreatePostUseCase::new(repo.clone())
            .execute(blog.id, post_input("a"))
            .await
            .unwrap();

        let delete = DeletePostUseCase::new(repo);
        delete.execute(created.post.id).await.unwrap();
        let err = delete.execute(created.post.id).await.unwrap_err();
        assert!(matches!(err, BlogError::PostNotFound));
    }
}
