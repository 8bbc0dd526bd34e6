//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::{DeviceId, UserId};
use kernel::pagination::{PageQuery, SortField};

use crate::domain::entity::{device_session::DeviceSession, user::User};
use crate::error::AuthResult;

/// Sortable user columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSortBy {
    #[default]
    CreatedAt,
    Login,
    Email,
}

impl SortField for UserSortBy {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "createdAt" => Some(UserSortBy::CreatedAt),
            "login" => Some(UserSortBy::Login),
            "email" => Some(UserSortBy::Email),
            _ => None,
        }
    }
}

/// Search terms for the user list; a user matches if EITHER term matches
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search_login_term: Option<String>,
    pub search_email_term: Option<String>,
}

impl UserFilter {
    pub fn is_empty(&self) -> bool {
        self.search_login_term.is_none() && self.search_email_term.is_none()
    }
}

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    async fn insert_user(&self, user: &User) -> AuthResult<()>;

    async fn find_user(&self, id: &UserId) -> AuthResult<Option<User>>;

    async fn find_user_by_login(&self, login: &str) -> AuthResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Login lookup accepting either a login or an email
    async fn find_user_by_login_or_email(&self, login_or_email: &str) -> AuthResult<Option<User>>;

    async fn find_user_by_confirmation_code(&self, code: &str) -> AuthResult<Option<User>>;

    async fn find_user_by_recovery_code(&self, code: &str) -> AuthResult<Option<User>>;

    /// Persist confirmation, recovery and password changes
    async fn update_user(&self, user: &User) -> AuthResult<()>;

    /// `false` if no such user
    async fn delete_user(&self, id: &UserId) -> AuthResult<bool>;

    /// One page of users and the total number of matches
    async fn list_users(
        &self,
        filter: &UserFilter,
        query: &PageQuery<UserSortBy>,
    ) -> AuthResult<(Vec<User>, u64)>;

    async fn clear_users(&self) -> AuthResult<()>;
}

/// Device session repository trait
#[trait_variant::make(DeviceSessionRepository: Send)]
pub trait LocalDeviceSessionRepository {
    async fn insert_session(&self, session: &DeviceSession) -> AuthResult<()>;

    async fn find_session(&self, device_id: &DeviceId) -> AuthResult<Option<DeviceSession>>;

    /// Sessions of a user that have not expired at `now`
    async fn list_sessions(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> AuthResult<Vec<DeviceSession>>;

    /// Store a rotated session only if its stored token id is still
    /// `previous_token_id`. `false` means another refresh won the race.
    async fn replace_session_token(
        &self,
        session: &DeviceSession,
        previous_token_id: &str,
    ) -> AuthResult<bool>;

    async fn delete_session(&self, device_id: &DeviceId) -> AuthResult<bool>;

    /// Delete every session of the user except `keep`; returns how many
    async fn delete_other_sessions(&self, user_id: &UserId, keep: &DeviceId) -> AuthResult<u64>;

    async fn delete_user_sessions(&self, user_id: &UserId) -> AuthResult<u64>;

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> AuthResult<u64>;

    async fn clear_sessions(&self) -> AuthResult<()>;
}

/// Everything the auth use cases need from storage
pub trait AuthStore: UserRepository + DeviceSessionRepository + Clone + Send + Sync + 'static {}

impl<T> AuthStore for T where
    T: UserRepository + DeviceSessionRepository + Clone + Send + Sync + 'static
{
}
