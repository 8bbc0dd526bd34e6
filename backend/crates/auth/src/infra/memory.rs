//! In-memory Repository Implementations
//!
//! Used when no database is configured, and by tests.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{DeviceId, UserId};
use kernel::pagination::{PageQuery, contains_ignore_case};
use tokio::sync::RwLock;

use crate::domain::entity::{device_session::DeviceSession, user::User};
use crate::domain::repository::{
    DeviceSessionRepository, UserFilter, UserRepository, UserSortBy,
};
use crate::error::AuthResult;

#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    sessions: Arc<RwLock<HashMap<DeviceId, DeviceSession>>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn find_user_where(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.users.read().await.values().find(|u| pred(u)).cloned()
    }
}

fn matches_filter(user: &User, filter: &UserFilter) -> bool {
    if filter.is_empty() {
        return true;
    }
    let login_hit = filter
        .search_login_term
        .as_deref()
        .is_some_and(|term| contains_ignore_case(user.login.as_str(), term));
    let email_hit = filter
        .search_email_term
        .as_deref()
        .is_some_and(|term| contains_ignore_case(user.email.as_str(), term));
    login_hit || email_hit
}

fn compare_users(a: &User, b: &User, sort_by: UserSortBy) -> Ordering {
    let by_key = match sort_by {
        UserSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
        UserSortBy::Login => a.login.as_str().cmp(b.login.as_str()),
        UserSortBy::Email => a.email.as_str().cmp(b.email.as_str()),
    };
    by_key.then_with(|| a.id.cmp(&b.id))
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for InMemoryAuthRepository {
    async fn insert_user(&self, user: &User) -> AuthResult<()> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user(&self, id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_user_by_login(&self, login: &str) -> AuthResult<Option<User>> {
        Ok(self.find_user_where(|u| u.login.as_str() == login).await)
    }

    async fn find_user_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        Ok(self.find_user_where(|u| u.email.as_str() == email).await)
    }

    async fn find_user_by_login_or_email(&self, login_or_email: &str) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        let found = users
            .values()
            .find(|u| u.login.as_str() == login_or_email)
            .or_else(|| users.values().find(|u| u.email.as_str() == login_or_email));
        Ok(found.cloned())
    }

    async fn find_user_by_confirmation_code(&self, code: &str) -> AuthResult<Option<User>> {
        Ok(self
            .find_user_where(|u| u.confirmation.as_ref().is_some_and(|c| c.code == code))
            .await)
    }

    async fn find_user_by_recovery_code(&self, code: &str) -> AuthResult<Option<User>> {
        Ok(self
            .find_user_where(|u| u.recovery.as_ref().is_some_and(|c| c.code == code))
            .await)
    }

    async fn update_user(&self, user: &User) -> AuthResult<()> {
        if let Some(stored) = self.users.write().await.get_mut(&user.id) {
            *stored = user.clone();
        }
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> AuthResult<bool> {
        Ok(self.users.write().await.remove(id).is_some())
    }

    async fn list_users(
        &self,
        filter: &UserFilter,
        query: &PageQuery<UserSortBy>,
    ) -> AuthResult<(Vec<User>, u64)> {
        let mut matched: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| matches_filter(u, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| query.sort_direction.apply(compare_users(a, b, query.sort_by)));

        let total = matched.len() as u64;
        Ok((query.window(matched), total))
    }

    async fn clear_users(&self) -> AuthResult<()> {
        self.users.write().await.clear();
        Ok(())
    }
}

// ============================================================================
// Device Session Repository Implementation
// ============================================================================

impl DeviceSessionRepository for InMemoryAuthRepository {
    async fn insert_session(&self, session: &DeviceSession) -> AuthResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.device_id, session.clone());
        Ok(())
    }

    async fn find_session(&self, device_id: &DeviceId) -> AuthResult<Option<DeviceSession>> {
        Ok(self.sessions.read().await.get(device_id).cloned())
    }

    async fn list_sessions(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> AuthResult<Vec<DeviceSession>> {
        let mut sessions: Vec<DeviceSession> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.user_id == *user_id && s.expires_at >= now)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| a.last_active_date.cmp(&b.last_active_date));
        Ok(sessions)
    }

    async fn replace_session_token(
        &self,
        session: &DeviceSession,
        previous_token_id: &str,
    ) -> AuthResult<bool> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&session.device_id) {
            Some(stored) if stored.token_id == previous_token_id => {
                *stored = session.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_session(&self, device_id: &DeviceId) -> AuthResult<bool> {
        Ok(self.sessions.write().await.remove(device_id).is_some())
    }

    async fn delete_other_sessions(&self, user_id: &UserId, keep: &DeviceId) -> AuthResult<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, s| s.user_id != *user_id || id == keep);
        Ok((before - sessions.len()) as u64)
    }

    async fn delete_user_sessions(&self, user_id: &UserId) -> AuthResult<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != *user_id);
        Ok((before - sessions.len()) as u64)
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at >= now);
        Ok((before - sessions.len()) as u64)
    }

    async fn clear_sessions(&self) -> AuthResult<()> {
        self.sessions.write().await.clear();
        Ok(())
    }
}
