//! Blog Use Cases

use std::sync::Arc;

use kernel::id::BlogId;
use kernel::pagination::{PageQuery, Paginator};

use crate::domain::entity::blog::{Blog, BlogInput};
use crate::domain::repository::{BlogRepository, BlogSortBy, BlogStore};
use crate::error::{BlogError, BlogResult};

pub struct CreateBlogUseCase<B: BlogStore> {
    repo: Arc<B>,
}

impl<B: BlogStore> CreateBlogUseCase<B> {
    pub fn new(repo: Arc<B>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: BlogInput) -> BlogResult<Blog> {
        let blog = Blog::new(input, kernel::time::now());
        self.repo.insert_blog(&blog).await?;
        tracing::info!(blog_id = %blog.id, name = %blog.name, "Blog created");
        Ok(blog)
    }
}

pub struct GetBlogUseCase<B: BlogStore> {
    repo: Arc<B>,
}

impl<B: BlogStore> GetBlogUseCase<B> {
    pub fn new(repo: Arc<B>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: BlogId) -> BlogResult<Blog> {
        self.repo
            .find_blog(&id)
            .await?
            .ok_or(BlogError::BlogNotFound)
    }
}

pub struct ListBlogsUseCase<B: BlogStore> {
    repo: Arc<B>,
}

impl<B: BlogStore> ListBlogsUseCase<B> {
    pub fn new(repo: Arc<B>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        name_term: Option<String>,
        query: PageQuery<BlogSortBy>,
    ) -> BlogResult<Paginator<Blog>> {
        let (items, total) = self.repo.list_blogs(name_term.as_deref(), &query).await?;
        Ok(Paginator::new(&query, total, items))
    }
}

pub struct UpdateBlogUseCase<B: BlogStore> {
    repo: Arc<B>,
}

impl<B: BlogStore> UpdateBlogUseCase<B> {
    pub fn new(repo: Arc<B>) -> Self {
        Self { repo }
    }

    /// Existing posts keep the blog name they were written with
    pub async fn execute(&self, id: BlogId, input: BlogInput) -> BlogResult<()> {
        let mut blog = self
            .repo
            .find_blog(&id)
            .await?
            .ok_or(BlogError::BlogNotFound)?;
        blog.apply(input);
        if !self.repo.update_blog(&blog).await? {
            return Err(BlogError::BlogNotFound);
        }
        tracing::info!(blog_id = %id, "Blog updated");
        Ok(())
    }
}

pub struct DeleteBlogUseCase<B: BlogStore> {
    repo: Arc<B>,
}

impl<B: BlogStore> DeleteBlogUseCase<B> {
    pub fn new(repo: Arc<B>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: BlogId) -> BlogResult<()> {
        if !self.repo.delete_blog(&id).await? {
            return Err(BlogError::BlogNotFound);
        }
        tracing::info!(blog_id = %id, "Blog deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::blog_input;
    use crate::infra::memory::InMemoryBlogRepository;
    use kernel::pagination::PageParams;

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let blog = CreateBlogUseCase::new(repo.clone())
            .execute(blog_input("rust"))
            .await
            .unwrap();
        assert!(!blog.is_membership);

        let found = GetBlogUseCase::new(repo).execute(blog.id).await.unwrap();
        assert_eq!(found, blog);
    }

    #[tokio::test]
    async fn test_get_unknown_blog() {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let err = GetBlogUseCase::new(repo)
            .execute(BlogId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::BlogNotFound));
    }

    #[tokio::test]
    async fn test_list_with_name_term() {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let create = CreateBlogUseCase::new(repo.clone());
        for name in ["Rust news", "Go news", "rustacean"] {
            create.execute(blog_input(name)).await.unwrap();
        }

        let page = ListBlogsUseCase::new(repo)
            .execute(Some("RUST".to_string()), PageParams::default().resolve())
            .await
            .unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.pages_count, 1);
        assert!(page.items.iter().all(|b| b.name.to_lowercase().contains("rust")));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let blog = CreateBlogUseCase::new(repo.clone())
            .execute(blog_input("old"))
            .await
            .unwrap();

        UpdateBlogUseCase::new(repo.clone())
            .execute(blog.id, blog_input("new"))
            .await
            .unwrap();
        let found = GetBlogUseCase::new(repo.clone()).execute(blog.id).await.unwrap();
        assert_eq!(found.name, "new");
        assert_eq!(found.created_at, blog.created_at);

        DeleteBlogUseCase::new(repo.clone()).execute(blog.id).await.unwrap();
        let err = DeleteBlogUseCase::new(repo).execute(blog.id).await.unwrap_err();
        assert!(matches!(err, BlogError::BlogNotFound));
    }
}
