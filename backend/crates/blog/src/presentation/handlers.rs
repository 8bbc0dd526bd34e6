//! HTTP Handlers
//!
//! Request bodies are validated before path ids are resolved, so a bad body
//! on a missing resource is still a 400.

use std::sync::Arc;

use auth::guards::{CurrentUser, MaybeUser, SuperAdmin};
use auth::{AdminCredentials, TokenService};
use axum::Json;
use axum::extract::{FromRef, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::extract::JsonBody;
use kernel::id::{BlogId, CommentId, PostId};
use kernel::pagination::{PageParams, Paginator};

use crate::application::{
    CreateBlogUseCase, CreateCommentUseCase, CreatePostUseCase, DeleteBlogUseCase,
    DeleteCommentUseCase, DeletePostUseCase, GetBlogUseCase, GetCommentUseCase, GetPostUseCase,
    ListBlogsUseCase, ListCommentsUseCase, ListPostsUseCase, SetReactionUseCase,
    UpdateBlogUseCase, UpdateCommentUseCase, UpdatePostUseCase,
};
use crate::domain::entity::reaction::ReactionTarget;
use crate::domain::repository::{BlogStore, UserLookup};
use crate::error::{BlogError, BlogResult};
use crate::presentation::dto::{
    BlogSearchParams, BlogView, CommentView, PostView, parse_blog_input, parse_comment_content,
    parse_like_status, parse_post_input, parse_post_with_blog,
};

/// Shared state for blog handlers
pub struct BlogAppState<B: BlogStore, U: UserLookup> {
    pub repo: Arc<B>,
    pub users: Arc<U>,
    pub tokens: Arc<TokenService>,
    pub admin: Arc<AdminCredentials>,
}

impl<B: BlogStore, U: UserLookup> BlogAppState<B, U> {
    pub fn new(
        repo: Arc<B>,
        users: Arc<U>,
        tokens: Arc<TokenService>,
        admin: Arc<AdminCredentials>,
    ) -> Self {
        Self {
            repo,
            users,
            tokens,
            admin,
        }
    }
}

impl<B: BlogStore, U: UserLookup> Clone for BlogAppState<B, U> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            users: self.users.clone(),
            tokens: self.tokens.clone(),
            admin: self.admin.clone(),
        }
    }
}

impl<B: BlogStore, U: UserLookup> FromRef<BlogAppState<B, U>> for Arc<TokenService> {
    fn from_ref(state: &BlogAppState<B, U>) -> Self {
        state.tokens.clone()
    }
}

impl<B: BlogStore, U: UserLookup> FromRef<BlogAppState<B, U>> for Arc<AdminCredentials> {
    fn from_ref(state: &BlogAppState<B, U>) -> Self {
        state.admin.clone()
    }
}

fn blog_id(raw: &str) -> BlogResult<BlogId> {
    BlogId::parse(raw).ok_or(BlogError::BlogNotFound)
}

fn post_id(raw: &str) -> BlogResult<PostId> {
    PostId::parse(raw).ok_or(BlogError::PostNotFound)
}

fn comment_id(raw: &str) -> BlogResult<CommentId> {
    CommentId::parse(raw).ok_or(BlogError::CommentNotFound)
}

// ============================================================================
// Blogs
// ============================================================================

/// GET /blogs
pub async fn list_blogs<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    Query(page): Query<PageParams>,
    Query(search): Query<BlogSearchParams>,
) -> BlogResult<Json<Paginator<BlogView>>> {
    let page = ListBlogsUseCase::new(state.repo.clone())
        .execute(search.name_term(), page.resolve())
        .await?;
    Ok(Json(page.map(BlogView::from)))
}

/// GET /blogs/{id}
pub async fn get_blog<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    Path(id): Path<String>,
) -> BlogResult<Json<BlogView>> {
    let blog = GetBlogUseCase::new(state.repo.clone())
        .execute(blog_id(&id)?)
        .await?;
    Ok(Json(blog.into()))
}

/// POST /blogs
pub async fn create_blog<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    _admin: SuperAdmin,
    body: JsonBody,
) -> BlogResult<impl IntoResponse> {
    let input = parse_blog_input(&body)?;
    let blog = CreateBlogUseCase::new(state.repo.clone())
        .execute(input)
        .await?;
    Ok((StatusCode::CREATED, Json(BlogView::from(blog))))
}

/// PUT /blogs/{id}
pub async fn update_blog<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    _admin: SuperAdmin,
    Path(id): Path<String>,
    body: JsonBody,
) -> BlogResult<StatusCode> {
    let input = parse_blog_input(&body)?;
    UpdateBlogUseCase::new(state.repo.clone())
        .execute(blog_id(&id)?, input)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /blogs/{id}
pub async fn delete_blog<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    _admin: SuperAdmin,
    Path(id): Path<String>,
) -> BlogResult<StatusCode> {
    DeleteBlogUseCase::new(state.repo.clone())
        .execute(blog_id(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /blogs/{id}/posts
pub async fn list_blog_posts<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<String>,
    Query(page): Query<PageParams>,
) -> BlogResult<Json<Paginator<PostView>>> {
    let page = ListPostsUseCase::new(state.repo.clone())
        .execute(Some(blog_id(&id)?), page.resolve(), viewer)
        .await?;
    Ok(Json(page.map(PostView::from)))
}

/// POST /blogs/{id}/posts
pub async fn create_blog_post<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    _admin: SuperAdmin,
    Path(id): Path<String>,
    body: JsonBody,
) -> BlogResult<impl IntoResponse> {
    let input = parse_post_input(&body)?;
    let created = CreatePostUseCase::new(state.repo.clone())
        .execute_in_blog(blog_id(&id)?, input)
        .await?;
    Ok((StatusCode::CREATED, Json(PostView::from(created))))
}

// ============================================================================
// Posts
// ============================================================================

/// GET /posts
pub async fn list_posts<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    MaybeUser(viewer): MaybeUser,
    Query(page): Query<PageParams>,
) -> BlogResult<Json<Paginator<PostView>>> {
    let page = ListPostsUseCase::new(state.repo.clone())
        .execute(None, page.resolve(), viewer)
        .await?;
    Ok(Json(page.map(PostView::from)))
}

/// GET /posts/{id}
pub async fn get_post<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<String>,
) -> BlogResult<Json<PostView>> {
    let details = GetPostUseCase::new(state.repo.clone())
        .execute(post_id(&id)?, viewer)
        .await?;
    Ok(Json(details.into()))
}

/// POST /posts
pub async fn create_post<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    _admin: SuperAdmin,
    body: JsonBody,
) -> BlogResult<impl IntoResponse> {
    let (input, blog_id) = parse_post_with_blog(&body)?;
    let created = CreatePostUseCase::new(state.repo.clone())
        .execute(blog_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(PostView::from(created))))
}

/// PUT /posts/{id}
pub async fn update_post<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    _admin: SuperAdmin,
    Path(id): Path<String>,
    body: JsonBody,
) -> BlogResult<StatusCode> {
    let (input, blog_id) = parse_post_with_blog(&body)?;
    UpdatePostUseCase::new(state.repo.clone())
        .execute(post_id(&id)?, blog_id, input)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /posts/{id}
pub async fn delete_post<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    _admin: SuperAdmin,
    Path(id): Path<String>,
) -> BlogResult<StatusCode> {
    DeletePostUseCase::new(state.repo.clone())
        .execute(post_id(&id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /posts/{id}/like-status
pub async fn set_post_like_status<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    body: JsonBody,
) -> BlogResult<StatusCode> {
    let status = parse_like_status(&body)?;
    let target = ReactionTarget::Post(post_id(&id)?);
    SetReactionUseCase::new(state.repo.clone(), state.users.clone())
        .execute(target, user_id, status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /posts/{id}/comments
pub async fn list_post_comments<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<String>,
    Query(page): Query<PageParams>,
) -> BlogResult<Json<Paginator<CommentView>>> {
    let page = ListCommentsUseCase::new(state.repo.clone())
        .execute(post_id(&id)?, page.resolve(), viewer)
        .await?;
    Ok(Json(page.map(CommentView::from)))
}

/// POST /posts/{id}/comments
pub async fn create_post_comment<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    body: JsonBody,
) -> BlogResult<impl IntoResponse> {
    let content = parse_comment_content(&body)?;
    let created = CreateCommentUseCase::new(state.repo.clone(), state.users.clone())
        .execute(post_id(&id)?, user_id, content)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentView::from(created))))
}

// ============================================================================
// Comments
// ============================================================================

/// GET /comments/{id}
pub async fn get_comment<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<String>,
) -> BlogResult<Json<CommentView>> {
    let details = GetCommentUseCase::new(state.repo.clone())
        .execute(comment_id(&id)?, viewer)
        .await?;
    Ok(Json(details.into()))
}

/// PUT /comments/{id}
pub async fn update_comment<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    body: JsonBody,
) -> BlogResult<StatusCode> {
    let content = parse_comment_content(&body)?;
    UpdateCommentUseCase::new(state.repo.clone())
        .execute(comment_id(&id)?, user_id, content)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /comments/{id}
pub async fn delete_comment<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> BlogResult<StatusCode> {
    DeleteCommentUseCase::new(state.repo.clone())
        .execute(comment_id(&id)?, user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /comments/{id}/like-status
pub async fn set_comment_like_status<B: BlogStore, U: UserLookup>(
    State(state): State<BlogAppState<B, U>>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    body: JsonBody,
) -> BlogResult<StatusCode> {
    let status = parse_like_status(&body)?;
    let target = ReactionTarget::Comment(comment_id(&id)?);
    SetReactionUseCase::new(state.repo.clone(), state.users.clone())
        .execute(target, user_id, status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
