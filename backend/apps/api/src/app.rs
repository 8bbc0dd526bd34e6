//! Router Assembly

use std::sync::Arc;

use auth::{AuthAppState, AuthStore, auth_router, devices_router, users_router};
use axum::Router;
use blog::{BlogAppState, BlogStore, blogs_router, comments_router, posts_router};
use platform::mail::Mailer;
use platform::rate_limit::{InMemoryRateLimitStore, RateLimiter};

use crate::config::ApiConfig;
use crate::testing::{TestingState, testing_router};

/// Full application router over the given stores.
///
/// The auth store doubles as the user directory the blog crate reads
/// commentator logins from.
pub fn build_app<A, B>(config: &ApiConfig, users: Arc<A>, blogs: Arc<B>, mailer: Arc<Mailer>) -> Router
where
    A: AuthStore,
    B: BlogStore,
{
    let limiter = RateLimiter::new(InMemoryRateLimitStore::new(), config.rate_limit.clone());

    let auth_state = AuthAppState::new(users.clone(), config.auth.clone(), mailer);
    let blog_state = BlogAppState::new(
        blogs.clone(),
        users.clone(),
        auth_state.tokens.clone(),
        auth_state.admin.clone(),
    );
    let testing_state = TestingState {
        users,
        blogs,
        limiter: limiter.clone(),
    };

    Router::new()
        .nest("/auth", auth_router(auth_state.clone(), limiter))
        .nest("/users", users_router(auth_state.clone()))
        .nest("/security/devices", devices_router(auth_state))
        .nest("/blogs", blogs_router(blog_state.clone()))
        .nest("/posts", posts_router(blog_state.clone()))
        .nest("/comments", comments_router(blog_state))
        .nest("/testing", testing_router(testing_state))
}
