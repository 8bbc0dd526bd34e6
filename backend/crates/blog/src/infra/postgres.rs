//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppError;
use kernel::id::{BlogId, CommentId, Id, PostId, UserId};
use kernel::pagination::{PageQuery, ilike_contains};
use sqlx::PgPool;

use crate::domain::entity::{
    blog::Blog,
    comment::{Comment, CommentatorInfo},
    post::Post,
    reaction::{LikeStatus, Reaction, ReactionCounts, ReactionTarget},
};
use crate::domain::repository::{
    BlogRepository, BlogSortBy, CommentRepository, CommentSortBy, PostRepository, PostSortBy,
    ReactionRepository,
};
use crate::error::{BlogError, BlogResult};

const BLOG_COLUMNS: &str = "id, name, description, website_url, created_at, is_membership";

const POST_COLUMNS: &str =
    "id, title, short_description, content, blog_id, blog_name, created_at";

const COMMENT_COLUMNS: &str = "id, post_id, content, user_id, user_login, created_at";

const REACTION_COLUMNS: &str = "target_type, target_id, user_id, user_login, status, added_at";

/// PostgreSQL-backed blog repository
#[derive(Clone)]
pub struct PgBlogRepository {
    pool: PgPool,
}

impl PgBlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn blog_sort_column(sort_by: BlogSortBy) -> &'static str {
    match sort_by {
        BlogSortBy::CreatedAt => "created_at",
        BlogSortBy::Name => r#"name COLLATE "C""#,
        BlogSortBy::Description => r#"description COLLATE "C""#,
        BlogSortBy::WebsiteUrl => r#"website_url COLLATE "C""#,
        BlogSortBy::IsMembership => "is_membership",
    }
}

fn post_sort_column(sort_by: PostSortBy) -> &'static str {
    match sort_by {
        PostSortBy::CreatedAt => "created_at",
        PostSortBy::Title => r#"title COLLATE "C""#,
        PostSortBy::ShortDescription => r#"short_description COLLATE "C""#,
        PostSortBy::Content => r#"content COLLATE "C""#,
        PostSortBy::BlogId => "blog_id",
        PostSortBy::BlogName => r#"blog_name COLLATE "C""#,
    }
}

fn comment_sort_column(sort_by: CommentSortBy) -> &'static str {
    match sort_by {
        CommentSortBy::CreatedAt => "created_at",
        CommentSortBy::Content => r#"content COLLATE "C""#,
    }
}

/// `ORDER BY <column> <dir>, id <dir>`
fn order_by(column: &str, query: &PageQuery<impl Copy>) -> String {
    let direction = query.sort_direction.as_sql();
    format!("ORDER BY {} {}, id {}", column, direction, direction)
}

fn corrupt(what: &str, value: &str) -> BlogError {
    BlogError::App(AppError::internal(format!("Invalid {} in database: {}", what, value)))
}

fn parse_id<T>(what: &str, value: &str) -> BlogResult<Id<T>> {
    Id::parse(value.trim()).ok_or_else(|| corrupt(what, value))
}

fn total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

// ============================================================================
// Blogs
// ============================================================================

impl BlogRepository for PgBlogRepository {
    async fn insert_blog(&self, blog: &Blog) -> BlogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO blogs (id, name, description, website_url, created_at, is_membership)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(blog.id.to_string())
        .bind(&blog.name)
        .bind(&blog.description)
        .bind(&blog.website_url)
        .bind(blog.created_at)
        .bind(blog.is_membership)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_blog(&self, id: &BlogId) -> BlogResult<Option<Blog>> {
        let sql = format!("SELECT {} FROM blogs WHERE id = $1", BLOG_COLUMNS);
        let row = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(BlogRow::into_blog).transpose()
    }

    async fn list_blogs(
        &self,
        name_term: Option<&str>,
        query: &PageQuery<BlogSortBy>,
    ) -> BlogResult<(Vec<Blog>, u64)> {
        const FILTER: &str = "$1::text IS NULL OR name ILIKE $1";
        let pattern = name_term.map(ilike_contains);

        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM blogs WHERE {}", FILTER))
            .bind(pattern.as_deref())
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM blogs WHERE {} {} LIMIT $2 OFFSET $3",
            BLOG_COLUMNS,
            FILTER,
            order_by(blog_sort_column(query.sort_by), query)
        );
        let rows = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(pattern.as_deref())
            .bind(query.sql_limit())
            .bind(query.sql_offset())
            .fetch_all(&self.pool)
            .await?;

        let blogs = rows
            .into_iter()
            .map(BlogRow::into_blog)
            .collect::<BlogResult<Vec<_>>>()?;
        Ok((blogs, total(count)))
    }

    async fn update_blog(&self, blog: &Blog) -> BlogResult<bool> {
        let result = sqlx::query(
            "UPDATE blogs SET name = $2, description = $3, website_url = $4 WHERE id = $1",
        )
        .bind(blog.id.to_string())
        .bind(&blog.name)
        .bind(&blog.description)
        .bind(&blog.website_url)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_blog(&self, id: &BlogId) -> BlogResult<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_blogs(&self) -> BlogResult<()> {
        sqlx::query("DELETE FROM blogs").execute(&self.pool).await?;
        Ok(())
    }
}

// ============================================================================
// Posts
// ============================================================================

impl PostRepository for PgBlogRepository {
    async fn insert_post(&self, post: &Post) -> BlogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, title, short_description, content, blog_id, blog_name, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(post.id.to_string())
        .bind(&post.title)
        .bind(&post.short_description)
        .bind(&post.content)
        .bind(post.blog_id.to_string())
        .bind(&post.blog_name)
        .bind(post.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_post(&self, id: &PostId) -> BlogResult<Option<Post>> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(PostRow::into_post).transpose()
    }

    async fn list_posts(
        &self,
        blog_id: Option<&BlogId>,
        query: &PageQuery<PostSortBy>,
    ) -> BlogResult<(Vec<Post>, u64)> {
        const FILTER: &str = "$1::text IS NULL OR blog_id = $1";
        let blog_id = blog_id.map(ToString::to_string);

        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM posts WHERE {}", FILTER))
            .bind(blog_id.as_deref())
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM posts WHERE {} {} LIMIT $2 OFFSET $3",
            POST_COLUMNS,
            FILTER,
            order_by(post_sort_column(query.sort_by), query)
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(blog_id.as_deref())
            .bind(query.sql_limit())
            .bind(query.sql_offset())
            .fetch_all(&self.pool)
            .await?;

        let posts = rows
            .into_iter()
            .map(PostRow::into_post)
            .collect::<BlogResult<Vec<_>>>()?;
        Ok((posts, total(count)))
    }

    async fn update_post(&self, post: &Post) -> BlogResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts SET
                title = $2,
                short_description = $3,
                content = $4,
                blog_id = $5,
                blog_name = $6
            WHERE id = $1
            "#,
        )
        .bind(post.id.to_string())
        .bind(&post.title)
        .bind(&post.short_description)
        .bind(&post.content)
        .bind(post.blog_id.to_string())
        .bind(&post.blog_name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_post(&self, id: &PostId) -> BlogResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_posts(&self) -> BlogResult<()> {
        sqlx::query("DELETE FROM posts").execute(&self.pool).await?;
        Ok(())
    }
}

// ============================================================================
// Comments
// ============================================================================

impl CommentRepository for PgBlogRepository {
    async fn insert_comment(&self, comment: &Comment) -> BlogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, content, user_id, user_login, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment.id.to_string())
        .bind(comment.post_id.to_string())
        .bind(&comment.content)
        .bind(comment.commentator.user_id.to_string())
        .bind(&comment.commentator.user_login)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_comment(&self, id: &CommentId) -> BlogResult<Option<Comment>> {
        let sql = format!("SELECT {} FROM comments WHERE id = $1", COMMENT_COLUMNS);
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(CommentRow::into_comment).transpose()
    }

    async fn list_comments(
        &self,
        post_id: &PostId,
        query: &PageQuery<CommentSortBy>,
    ) -> BlogResult<(Vec<Comment>, u64)> {
        let post_id = post_id.to_string();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(&post_id)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM comments WHERE post_id = $1 {} LIMIT $2 OFFSET $3",
            COMMENT_COLUMNS,
            order_by(comment_sort_column(query.sort_by), query)
        );
        let rows = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(&post_id)
            .bind(query.sql_limit())
            .bind(query.sql_offset())
            .fetch_all(&self.pool)
            .await?;

        let comments = rows
            .into_iter()
            .map(CommentRow::into_comment)
            .collect::<BlogResult<Vec<_>>>()?;
        Ok((comments, total(count)))
    }

    async fn update_comment(&self, comment: &Comment) -> BlogResult<bool> {
        let result = sqlx::query("UPDATE comments SET content = $2 WHERE id = $1")
            .bind(comment.id.to_string())
            .bind(&comment.content)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_comment(&self, id: &CommentId) -> BlogResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_comments(&self) -> BlogResult<()> {
        sqlx::query("DELETE FROM comments").execute(&self.pool).await?;
        Ok(())
    }
}

// ============================================================================
// Reactions
// ============================================================================

impl ReactionRepository for PgBlogRepository {
    async fn find_reaction(
        &self,
        target: &ReactionTarget,
        user_id: &UserId,
    ) -> BlogResult<Option<Reaction>> {
        let sql = format!(
            "SELECT {} FROM reactions WHERE target_type = $1 AND target_id = $2 AND user_id = $3",
            REACTION_COLUMNS
        );
        let row = sqlx::query_as::<_, ReactionRow>(&sql)
            .bind(target.kind())
            .bind(target.id())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(ReactionRow::into_reaction).transpose()
    }

    async fn save_reaction(&self, reaction: &Reaction) -> BlogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reactions (target_type, target_id, user_id, user_login, status, added_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (target_type, target_id, user_id) DO UPDATE SET
                user_login = EXCLUDED.user_login,
                status = EXCLUDED.status,
                added_at = EXCLUDED.added_at
            "#,
        )
        .bind(reaction.target.kind())
        .bind(reaction.target.id())
        .bind(reaction.user_id.to_string())
        .bind(&reaction.user_login)
        .bind(reaction.status.as_str())
        .bind(reaction.added_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_reaction(&self, target: &ReactionTarget, user_id: &UserId) -> BlogResult<bool> {
        let result = sqlx::query(
            "DELETE FROM reactions WHERE target_type = $1 AND target_id = $2 AND user_id = $3",
        )
        .bind(target.kind())
        .bind(target.id())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_reactions(&self, target: &ReactionTarget) -> BlogResult<ReactionCounts> {
        let (likes, dislikes): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'Like'),
                COUNT(*) FILTER (WHERE status = 'Dislike')
            FROM reactions
            WHERE target_type = $1 AND target_id = $2
            "#,
        )
        .bind(target.kind())
        .bind(target.id())
        .fetch_one(&self.pool)
        .await?;

        Ok(ReactionCounts {
            likes: total(likes),
            dislikes: total(dislikes),
        })
    }

    async fn newest_likes(&self, target: &ReactionTarget, limit: usize) -> BlogResult<Vec<Reaction>> {
        let sql = format!(
            r#"
            SELECT {} FROM reactions
            WHERE target_type = $1 AND target_id = $2 AND status = 'Like'
            ORDER BY added_at DESC, user_id DESC
            LIMIT $3
            "#,
            REACTION_COLUMNS
        );
        let rows = sqlx::query_as::<_, ReactionRow>(&sql)
            .bind(target.kind())
            .bind(target.id())
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(ReactionRow::into_reaction).collect()
    }

    async fn clear_reactions(&self) -> BlogResult<()> {
        sqlx::query("DELETE FROM reactions").execute(&self.pool).await?;
        Ok(())
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct BlogRow {
    id: String,
    name: String,
    description: String,
    website_url: String,
    created_at: DateTime<Utc>,
    is_membership: bool,
}

impl BlogRow {
    fn into_blog(self) -> BlogResult<Blog> {
        Ok(Blog {
            id: parse_id("blog id", &self.id)?,
            name: self.name,
            description: self.description,
            website_url: self.website_url,
            created_at: self.created_at,
            is_membership: self.is_membership,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: String,
    title: String,
    short_description: String,
    content: String,
    blog_id: String,
    blog_name: String,
    created_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> BlogResult<Post> {
        Ok(Post {
            id: parse_id("post id", &self.id)?,
            title: self.title,
            short_description: self.short_description,
            content: self.content,
            blog_id: parse_id("blog id", &self.blog_id)?,
            blog_name: self.blog_name,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: String,
    post_id: String,
    content: String,
    user_id: String,
    user_login: String,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> BlogResult<Comment> {
        Ok(Comment {
            id: parse_id("comment id", &self.id)?,
            post_id: parse_id("post id", &self.post_id)?,
            content: self.content,
            commentator: CommentatorInfo {
                user_id: parse_id("user id", &self.user_id)?,
                user_login: self.user_login,
            },
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReactionRow {
    target_type: String,
    target_id: String,
    user_id: String,
    user_login: String,
    status: String,
    added_at: DateTime<Utc>,
}

fn parse_target(kind: &str, id: &str) -> BlogResult<ReactionTarget> {
    match kind {
        "post" => Ok(ReactionTarget::Post(parse_id("post id", id)?)),
        "comment" => Ok(ReactionTarget::Comment(parse_id("comment id", id)?)),
        other => Err(corrupt("reaction target", other)),
    }
}

impl ReactionRow {
    fn into_reaction(self) -> BlogResult<Reaction> {
        let status = match LikeStatus::parse(&self.status) {
            Some(status @ (LikeStatus::Like | LikeStatus::Dislike)) => status,
            _ => return Err(corrupt("reaction status", &self.status)),
        };
        Ok(Reaction {
            target: parse_target(&self.target_type, &self.target_id)?,
            user_id: parse_id("user id", &self.user_id)?,
            user_login: self.user_login,
            status,
            added_at: self.added_at,
        })
    }
}
