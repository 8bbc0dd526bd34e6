//! Test-support endpoint
//!
//! `DELETE /testing/all-data` empties every store and forgets rate-limit
//! counters. Mounted unconditionally; deployments that must not expose it
//! should block `/testing` at the proxy.

use std::sync::Arc;

use auth::AuthStore;
use auth::domain::repository::{DeviceSessionRepository, UserRepository};
use axum::{Router, extract::State, http::StatusCode, routing::delete};
use blog::BlogStore;
use blog::domain::repository::{
    BlogRepository, CommentRepository, PostRepository, ReactionRepository,
};
use kernel::error::app_error::AppResult;
use platform::rate_limit::{InMemoryRateLimitStore, RateLimiter};

pub struct TestingState<A, B> {
    pub users: Arc<A>,
    pub blogs: Arc<B>,
    pub limiter: RateLimiter<InMemoryRateLimitStore>,
}

impl<A, B> Clone for TestingState<A, B> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            blogs: self.blogs.clone(),
            limiter: self.limiter.clone(),
        }
    }
}

pub fn testing_router<A: AuthStore, B: BlogStore>(state: TestingState<A, B>) -> Router {
    Router::new()
        .route("/all-data", delete(wipe_all_data::<A, B>))
        .with_state(state)
}

async fn wipe_all_data<A: AuthStore, B: BlogStore>(
    State(state): State<TestingState<A, B>>,
) -> AppResult<StatusCode> {
    wipe_auth(state.users.as_ref())
        .await
        .map_err(auth::AuthError::into_app_error)?;
    wipe_blog(state.blogs.as_ref())
        .await
        .map_err(blog::BlogError::into_app_error)?;
    state.limiter.reset().await;

    tracing::info!("All data wiped");
    Ok(StatusCode::NO_CONTENT)
}

async fn wipe_auth<A: AuthStore>(users: &A) -> auth::AuthResult<()> {
    DeviceSessionRepository::clear_sessions(users).await?;
    UserRepository::clear_users(users).await
}

async fn wipe_blog<B: BlogStore>(blogs: &B) -> blog::BlogResult<()> {
    ReactionRepository::clear_reactions(blogs).await?;
    CommentRepository::clear_comments(blogs).await?;
    PostRepository::clear_posts(blogs).await?;
    BlogRepository::clear_blogs(blogs).await
}
