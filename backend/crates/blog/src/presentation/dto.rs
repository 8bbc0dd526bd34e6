//! API DTOs (Data Transfer Objects)
//!
//! Request bodies are read as raw JSON and checked field by field so that
//! every failure is reported in `errorsMessages`.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppError;
use kernel::extract::JsonBody;
use kernel::id::BlogId;
use kernel::pagination::search_term;
use kernel::validation::Validator;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::application::{CommentDetails, LikesInfo, PostDetails};
use crate::domain::entity::blog::{Blog, BlogInput};
use crate::domain::entity::post::PostInput;
use crate::domain::entity::reaction::{LikeStatus, Reaction};
use crate::error::BlogResult;

pub const BLOG_NAME_MAX_LENGTH: usize = 15;
pub const BLOG_DESCRIPTION_MAX_LENGTH: usize = 500;
pub const WEBSITE_URL_MAX_LENGTH: usize = 100;
pub const POST_TITLE_MAX_LENGTH: usize = 30;
pub const POST_SHORT_DESCRIPTION_MAX_LENGTH: usize = 100;
pub const POST_CONTENT_MAX_LENGTH: usize = 1000;
pub const COMMENT_MIN_LENGTH: usize = 20;
pub const COMMENT_MAX_LENGTH: usize = 300;

pub static WEBSITE_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://([a-zA-Z0-9_-]+\.)+[a-zA-Z0-9_-]+(/[a-zA-Z0-9_-]+)*/?$")
        .unwrap_or_else(|_| unreachable!())
});

// ============================================================================
// Requests
// ============================================================================

/// `{name, description, websiteUrl}`
pub fn parse_blog_input(body: &JsonBody) -> BlogResult<BlogInput> {
    let mut v = Validator::new();
    let name = v
        .field("name", body.get("name"))
        .string()
        .trim()
        .length(1, BLOG_NAME_MAX_LENGTH)
        .done();
    let description = v
        .field("description", body.get("description"))
        .string()
        .trim()
        .length(1, BLOG_DESCRIPTION_MAX_LENGTH)
        .done();
    let website_url = v
        .field("websiteUrl", body.get("websiteUrl"))
        .string()
        .trim()
        .not_empty()
        .max_len(WEBSITE_URL_MAX_LENGTH)
        .matches(&WEBSITE_URL_PATTERN)
        .done();
    v.finish()?;

    Ok(BlogInput {
        name: name.unwrap_or_default(),
        description: description.unwrap_or_default(),
        website_url: website_url.unwrap_or_default(),
    })
}

fn post_fields(v: &mut Validator, body: &JsonBody) -> PostInput {
    let title = v
        .field("title", body.get("title"))
        .string()
        .trim()
        .length(1, POST_TITLE_MAX_LENGTH)
        .done();
    let short_description = v
        .field("shortDescription", body.get("shortDescription"))
        .string()
        .trim()
        .length(1, POST_SHORT_DESCRIPTION_MAX_LENGTH)
        .done();
    let content = v
        .field("content", body.get("content"))
        .string()
        .trim()
        .length(1, POST_CONTENT_MAX_LENGTH)
        .done();

    PostInput {
        title: title.unwrap_or_default(),
        short_description: short_description.unwrap_or_default(),
        content: content.unwrap_or_default(),
    }
}

/// `{title, shortDescription, content}` for POST /blogs/{blogId}/posts
pub fn parse_post_input(body: &JsonBody) -> BlogResult<PostInput> {
    let mut v = Validator::new();
    let input = post_fields(&mut v, body);
    v.finish()?;
    Ok(input)
}

/// `{title, shortDescription, content, blogId}` for /posts
pub fn parse_post_with_blog(body: &JsonBody) -> BlogResult<(PostInput, BlogId)> {
    let mut v = Validator::new();
    let input = post_fields(&mut v, body);
    let raw_blog_id = v
        .field("blogId", body.get("blogId"))
        .string()
        .trim()
        .not_empty()
        .done();
    let blog_id = match raw_blog_id.as_deref().map(BlogId::parse) {
        Some(Some(id)) => Some(id),
        Some(None) => {
            v.push("blogId", "blogId has invalid format");
            None
        }
        None => None,
    };
    v.finish()?;

    let blog_id = blog_id.ok_or_else(|| AppError::internal("blogId missing after validation"))?;
    Ok((input, blog_id))
}

/// `{content}`
pub fn parse_comment_content(body: &JsonBody) -> BlogResult<String> {
    let mut v = Validator::new();
    let content = v
        .field("content", body.get("content"))
        .string()
        .trim()
        .length(COMMENT_MIN_LENGTH, COMMENT_MAX_LENGTH)
        .done();
    v.finish()?;
    Ok(content.unwrap_or_default())
}

/// `{likeStatus}`
pub fn parse_like_status(body: &JsonBody) -> BlogResult<LikeStatus> {
    let mut v = Validator::new();
    let status = v
        .field("likeStatus", body.get("likeStatus"))
        .string()
        .one_of(&LikeStatus::VALUES)
        .done();
    v.finish()?;
    Ok(status
        .as_deref()
        .and_then(LikeStatus::parse)
        .unwrap_or_default())
}

/// `?searchNameTerm=`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSearchParams {
    pub search_name_term: Option<String>,
}

impl BlogSearchParams {
    pub fn name_term(&self) -> Option<String> {
        search_term(self.search_name_term.as_deref())
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub website_url: String,
    #[serde(with = "kernel::time::iso")]
    pub created_at: DateTime<Utc>,
    pub is_membership: bool,
}

impl From<Blog> for BlogView {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id.to_string(),
            name: blog.name,
            description: blog.description,
            website_url: blog.website_url,
            created_at: blog.created_at,
            is_membership: blog.is_membership,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeDetailsView {
    #[serde(with = "kernel::time::iso")]
    pub added_at: DateTime<Utc>,
    pub user_id: String,
    pub login: String,
}

impl From<Reaction> for LikeDetailsView {
    fn from(reaction: Reaction) -> Self {
        Self {
            added_at: reaction.added_at,
            user_id: reaction.user_id.to_string(),
            login: reaction.user_login,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesInfoView {
    pub likes_count: u64,
    pub dislikes_count: u64,
    pub my_status: LikeStatus,
}

impl From<LikesInfo> for LikesInfoView {
    fn from(info: LikesInfo) -> Self {
        Self {
            likes_count: info.likes_count,
            dislikes_count: info.dislikes_count,
            my_status: info.my_status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedLikesInfoView {
    pub likes_count: u64,
    pub dislikes_count: u64,
    pub my_status: LikeStatus,
    pub newest_likes: Vec<LikeDetailsView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub short_description: String,
    pub content: String,
    pub blog_id: String,
    pub blog_name: String,
    #[serde(with = "kernel::time::iso")]
    pub created_at: DateTime<Utc>,
    pub extended_likes_info: ExtendedLikesInfoView,
}

impl From<PostDetails> for PostView {
    fn from(details: PostDetails) -> Self {
        let PostDetails { post, likes } = details;
        Self {
            id: post.id.to_string(),
            title: post.title,
            short_description: post.short_description,
            content: post.content,
            blog_id: post.blog_id.to_string(),
            blog_name: post.blog_name,
            created_at: post.created_at,
            extended_likes_info: ExtendedLikesInfoView {
                likes_count: likes.likes.likes_count,
                dislikes_count: likes.likes.dislikes_count,
                my_status: likes.likes.my_status,
                newest_likes: likes.newest_likes.into_iter().map(Into::into).collect(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentatorInfoView {
    pub user_id: String,
    pub user_login: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub content: String,
    pub commentator_info: CommentatorInfoView,
    #[serde(with = "kernel::time::iso")]
    pub created_at: DateTime<Utc>,
    pub likes_info: LikesInfoView,
}

impl From<CommentDetails> for CommentView {
    fn from(details: CommentDetails) -> Self {
        let CommentDetails { comment, likes } = details;
        Self {
            id: comment.id.to_string(),
            content: comment.content,
            commentator_info: CommentatorInfoView {
                user_id: comment.commentator.user_id.to_string(),
                user_login: comment.commentator.user_login,
            },
            created_at: comment.created_at,
            likes_info: likes.into(),
        }
    }
}
