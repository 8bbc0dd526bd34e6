//! Application Layer
//!
//! Use cases for blogs, posts, comments and reactions.

pub mod blogs;
pub mod comments;
pub mod posts;
pub mod reactions;

// Re-exports
pub use blogs::{
    CreateBlogUseCase, DeleteBlogUseCase, GetBlogUseCase, ListBlogsUseCase, UpdateBlogUseCase,
};
pub use comments::{
    CommentDetails, CreateCommentUseCase, DeleteCommentUseCase, GetCommentUseCase,
    ListCommentsUseCase, UpdateCommentUseCase,
};
pub use posts::{
    CreatePostUseCase, DeletePostUseCase, GetPostUseCase, ListPostsUseCase, PostDetails,
    UpdatePostUseCase,
};
pub use reactions::{ExtendedLikesInfo, LikesInfo, SetReactionUseCase};

#[cfg(test)]
pub(crate) mod test_support {
    use auth::InMemoryAuthRepository;
    use auth::domain::repository::UserRepository;
    use auth::models::{email::Email, login::Login, user::User};
    use kernel::id::UserId;
    use platform::password::ClearTextPassword;

    use crate::domain::entity::blog::{Blog, BlogInput};
    use crate::domain::entity::post::{Post, PostInput};
    use crate::domain::repository::{BlogRepository, PostRepository};
    use crate::infra::memory::InMemoryBlogRepository;

    pub fn blog_input(name: &str) -> BlogInput {
        BlogInput {
            name: name.to_string(),
            description: "about things".to_string(),
            website_url: "https://example.com".to_string(),
        }
    }

    pub fn post_input(title: &str) -> PostInput {
        PostInput {
            title: title.to_string(),
            short_description: "short".to_string(),
            content: "content".to_string(),
        }
    }

    pub async fn seed_blog(repo: &InMemoryBlogRepository, name: &str) -> Blog {
        let blog = Blog::new(blog_input(name), kernel::time::now());
        repo.insert_blog(&blog).await.unwrap();
        blog
    }

    pub async fn seed_post(repo: &InMemoryBlogRepository) -> Post {
        let blog = seed_blog(repo, "blog").await;
        let post = Post::new(post_input("post"), &blog, kernel::time::now());
        repo.insert_post(&post).await.unwrap();
        post
    }

    pub async fn seed_user(users: &InMemoryAuthRepository, login: &str) -> UserId {
        let hash = ClearTextPassword::new("qwerty1".to_string())
            .unwrap()
            .hash()
            .unwrap();
        let user = User::create_confirmed(
            Login::new(login).unwrap(),
            Email::new(format!("{login}@example.com")).unwrap(),
            hash,
            kernel::time::now(),
        );
        users.insert_user(&user).await.unwrap();
        user.id
    }
}
