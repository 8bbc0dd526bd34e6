//! Blog Routers

use axum::{
    Router,
    routing::{get, put},
};

use crate::domain::repository::{BlogStore, UserLookup};
use crate::presentation::handlers::{self, BlogAppState};

/// `/blogs` routes
pub fn blogs_router<B: BlogStore, U: UserLookup>(state: BlogAppState<B, U>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_blogs::<B, U>).post(handlers::create_blog::<B, U>),
        )
        .route(
            "/{id}",
            get(handlers::get_blog::<B, U>)
                .put(handlers::update_blog::<B, U>)
                .delete(handlers::delete_blog::<B, U>),
        )
        .route(
            "/{id}/posts",
            get(handlers::list_blog_posts::<B, U>).post(handlers::create_blog_post::<B, U>),
        )
        .with_state(state)
}

/// `/posts` routes
pub fn posts_router<B: BlogStore, U: UserLookup>(state: BlogAppState<B, U>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_posts::<B, U>).post(handlers::create_post::<B, U>),
        )
        .route(
            "/{id}",
            get(handlers::get_post::<B, U>)
                .put(handlers::update_post::<B, U>)
                .delete(handlers::delete_post::<B, U>),
        )
        .route("/{id}/like-status", put(handlers::set_post_like_status::<B, U>))
        .route(
            "/{id}/comments",
            get(handlers::list_post_comments::<B, U>).post(handlers::create_post_comment::<B, U>),
        )
        .with_state(state)
}

/// `/comments` routes
pub fn comments_router<B: BlogStore, U: UserLookup>(state: BlogAppState<B, U>) -> Router {
    Router::new()
        .route(
            "/{id}",
            get(handlers::get_comment::<B, U>)
                .put(handlers::update_comment::<B, U>)
                .delete(handlers::delete_comment::<B, U>),
        )
        .route(
            "/{id}/like-status",
            put(handlers::set_comment_like_status::<B, U>),
        )
        .with_state(state)
}
