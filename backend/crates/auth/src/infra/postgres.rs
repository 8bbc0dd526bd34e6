//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppError;
use kernel::id::{DeviceId, Id, UserId};
use kernel::pagination::{PageQuery, ilike_contains};
use platform::password::HashedPassword;
use sqlx::PgPool;

use crate::domain::entity::{device_session::DeviceSession, user::User};
use crate::domain::repository::{
    DeviceSessionRepository, UserFilter, UserRepository, UserSortBy,
};
use crate::domain::value_object::{email::Email, expiring_code::ExpiringCode, login::Login};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = r#"
    id,
    login,
    email,
    password_hash,
    created_at,
    is_confirmed,
    confirmation_code,
    confirmation_expires_at,
    recovery_code,
    recovery_expires_at
"#;

const SESSION_COLUMNS: &str = r#"
    device_id,
    user_id,
    token_id,
    ip,
    title,
    last_active_date,
    expires_at
"#;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_user_by_column(&self, column: &str, value: &str) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }
}

fn user_sort_column(sort_by: UserSortBy) -> &'static str {
    match sort_by {
        UserSortBy::CreatedAt => "created_at",
        UserSortBy::Login => r#"login COLLATE "C""#,
        UserSortBy::Email => r#"email COLLATE "C""#,
    }
}

fn corrupt(what: &str, value: &str) -> AuthError {
    AuthError::App(AppError::internal(format!("Invalid {} in database: {}", what, value)))
}

fn parse_id<T>(what: &str, value: &str) -> AuthResult<Id<T>> {
    Id::parse(value.trim()).ok_or_else(|| corrupt(what, value))
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn insert_user(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                login,
                email,
                password_hash,
                created_at,
                is_confirmed,
                confirmation_code,
                confirmation_expires_at,
                recovery_code,
                recovery_expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id.to_string())
        .bind(user.login.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.created_at)
        .bind(user.is_confirmed)
        .bind(user.confirmation.as_ref().map(|c| c.code.clone()))
        .bind(user.confirmation.as_ref().map(|c| c.expires_at))
        .bind(user.recovery.as_ref().map(|c| c.code.clone()))
        .bind(user.recovery.as_ref().map(|c| c.expires_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_user(&self, id: &UserId) -> AuthResult<Option<User>> {
        self.find_user_by_column("id", &id.to_string()).await
    }

    async fn find_user_by_login(&self, login: &str) -> AuthResult<Option<User>> {
        self.find_user_by_column("login", login).await
    }

    async fn find_user_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        self.find_user_by_column("email", email).await
    }

    async fn find_user_by_login_or_email(&self, login_or_email: &str) -> AuthResult<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE login = $1 OR email = $1 ORDER BY (login = $1) DESC LIMIT 1",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(login_or_email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_user_by_confirmation_code(&self, code: &str) -> AuthResult<Option<User>> {
        self.find_user_by_column("confirmation_code", code).await
    }

    async fn find_user_by_recovery_code(&self, code: &str) -> AuthResult<Option<User>> {
        self.find_user_by_column("recovery_code", code).await
    }

    async fn update_user(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                password_hash = $2,
                is_confirmed = $3,
                confirmation_code = $4,
                confirmation_expires_at = $5,
                recovery_code = $6,
                recovery_expires_at = $7
            WHERE id = $1
            "#,
        )
        .bind(user.id.to_string())
        .bind(user.password_hash.as_phc_string())
        .bind(user.is_confirmed)
        .bind(user.confirmation.as_ref().map(|c| c.code.clone()))
        .bind(user.confirmation.as_ref().map(|c| c.expires_at))
        .bind(user.recovery.as_ref().map(|c| c.code.clone()))
        .bind(user.recovery.as_ref().map(|c| c.expires_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> AuthResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_users(
        &self,
        filter: &UserFilter,
        query: &PageQuery<UserSortBy>,
    ) -> AuthResult<(Vec<User>, u64)> {
        const FILTER: &str = r#"
            ($1::text IS NULL AND $2::text IS NULL)
            OR login ILIKE $1
            OR email ILIKE $2
        "#;
        let login_pattern = filter.search_login_term.as_deref().map(ilike_contains);
        let email_pattern = filter.search_email_term.as_deref().map(ilike_contains);

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {}", FILTER))
            .bind(login_pattern.as_deref())
            .bind(email_pattern.as_deref())
            .fetch_one(&self.pool)
            .await?;

        let direction = query.sort_direction.as_sql();
        let sql = format!(
            "SELECT {} FROM users WHERE {} ORDER BY {} {}, id {} LIMIT $3 OFFSET $4",
            USER_COLUMNS,
            FILTER,
            user_sort_column(query.sort_by),
            direction,
            direction
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(login_pattern.as_deref())
            .bind(email_pattern.as_deref())
            .bind(query.sql_limit())
            .bind(query.sql_offset())
            .fetch_all(&self.pool)
            .await?;

        let users = rows
            .into_iter()
            .map(UserRow::into_user)
            .collect::<AuthResult<Vec<_>>>()?;
        Ok((users, u64::try_from(total).unwrap_or(0)))
    }

    async fn clear_users(&self) -> AuthResult<()> {
        sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        Ok(())
    }
}

// ============================================================================
// Device Session Repository Implementation
// ============================================================================

impl DeviceSessionRepository for PgAuthRepository {
    async fn insert_session(&self, session: &DeviceSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO device_sessions (
                device_id,
                user_id,
                token_id,
                ip,
                title,
                last_active_date,
                expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(session.device_id.to_string())
        .bind(session.user_id.to_string())
        .bind(&session.token_id)
        .bind(&session.ip)
        .bind(&session.title)
        .bind(session.last_active_date)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(&self, device_id: &DeviceId) -> AuthResult<Option<DeviceSession>> {
        let sql = format!(
            "SELECT {} FROM device_sessions WHERE device_id = $1",
            SESSION_COLUMNS
        );
        let row = sqlx::query_as::<_, DeviceSessionRow>(&sql)
            .bind(device_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(DeviceSessionRow::into_session).transpose()
    }

    async fn list_sessions(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> AuthResult<Vec<DeviceSession>> {
        let sql = format!(
            "SELECT {} FROM device_sessions WHERE user_id = $1 AND expires_at >= $2 ORDER BY last_active_date ASC",
            SESSION_COLUMNS
        );
        let rows = sqlx::query_as::<_, DeviceSessionRow>(&sql)
            .bind(user_id.to_string())
            .bind(now)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(DeviceSessionRow::into_session).collect()
    }

    async fn replace_session_token(
        &self,
        session: &DeviceSession,
        previous_token_id: &str,
    ) -> AuthResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE device_sessions SET
                token_id = $2,
                ip = $3,
                last_active_date = $4,
                expires_at = $5
            WHERE device_id = $1 AND token_id = $6
            "#,
        )
        .bind(session.device_id.to_string())
        .bind(&session.token_id)
        .bind(&session.ip)
        .bind(session.last_active_date)
        .bind(session.expires_at)
        .bind(previous_token_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_session(&self, device_id: &DeviceId) -> AuthResult<bool> {
        let result = sqlx::query("DELETE FROM device_sessions WHERE device_id = $1")
            .bind(device_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_other_sessions(&self, user_id: &UserId, keep: &DeviceId) -> AuthResult<u64> {
        let result =
            sqlx::query("DELETE FROM device_sessions WHERE user_id = $1 AND device_id <> $2")
                .bind(user_id.to_string())
                .bind(keep.to_string())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    async fn delete_user_sessions(&self, user_id: &UserId) -> AuthResult<u64> {
        let result = sqlx::query("DELETE FROM device_sessions WHERE user_id = $1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM device_sessions WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired device sessions");

        Ok(deleted)
    }

    async fn clear_sessions(&self) -> AuthResult<()> {
        sqlx::query("DELETE FROM device_sessions")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    login: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    is_confirmed: bool,
    confirmation_code: Option<String>,
    confirmation_expires_at: Option<DateTime<Utc>>,
    recovery_code: Option<String>,
    recovery_expires_at: Option<DateTime<Utc>>,
}

fn expiring(code: Option<String>, expires_at: Option<DateTime<Utc>>) -> Option<ExpiringCode> {
    match (code, expires_at) {
        (Some(code), Some(expires_at)) => Some(ExpiringCode { code, expires_at }),
        _ => None,
    }
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            id: parse_id("user id", &self.id)?,
            login: Login::from_db(self.login),
            email: Email::from_db(self.email),
            password_hash: HashedPassword::from_phc_string(self.password_hash)?,
            created_at: self.created_at,
            is_confirmed: self.is_confirmed,
            confirmation: expiring(self.confirmation_code, self.confirmation_expires_at),
            recovery: expiring(self.recovery_code, self.recovery_expires_at),
        })
    }
}

#[derive(sqlx::FromRow)]
struct DeviceSessionRow {
    device_id: String,
    user_id: String,
    token_id: String,
    ip: String,
    title: String,
    last_active_date: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl DeviceSessionRow {
    fn into_session(self) -> AuthResult<DeviceSession> {
        Ok(DeviceSession {
            device_id: parse_id("device id", &self.device_id)?,
            user_id: parse_id("user id", &self.user_id)?,
            token_id: self.token_id,
            ip: self.ip,
            title: self.title,
            last_active_date: self.last_active_date,
            expires_at: self.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::pagination::SortDirection;

    #[test]
    fn test_sort_columns_are_whitelisted() {
        assert_eq!(user_sort_column(UserSortBy::CreatedAt), "created_at");
        assert!(user_sort_column(UserSortBy::Login).starts_with("login"));
        assert_eq!(SortDirection::Asc.as_sql(), "ASC");
    }

    #[test]
    fn test_expiring_requires_both_columns() {
        assert!(expiring(Some("c".to_string()), None).is_none());
        assert!(expiring(None, Some(Utc::now())).is_none());
        assert!(expiring(Some("c".to_string()), Some(Utc::now())).is_some());
    }

    #[test]
    fn test_corrupt_id_is_internal_error() {
        let err = parse_id::<kernel::id::markers::User>("user id", "xyz").unwrap_err();
        assert_eq!(err.kind().status_code(), 500);
    }
}
