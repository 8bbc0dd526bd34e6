//! User Management Use Cases
//!
//! Administrator-driven user creation, listing and deletion, plus the
//! uniqueness and password rules shared with self-registration.

use std::sync::Arc;

use kernel::error::app_error::AppError;
use kernel::id::UserId;
use kernel::pagination::{PageQuery, Paginator};
use kernel::validation::FieldError;
use platform::password::{ClearTextPassword, HashedPassword};

use crate::domain::entity::user::User;
use crate::domain::repository::{
    AuthStore, DeviceSessionRepository, UserFilter, UserRepository, UserSortBy,
};
use crate::domain::value_object::{email::Email, login::Login};
use crate::error::{AuthError, AuthResult};

/// Login, email and password of a new account
pub struct NewUserInput {
    pub login: String,
    pub email: String,
    pub password: String,
}

/// Login is checked before email
pub(crate) async fn ensure_available<R: UserRepository>(
    repo: &R,
    login: &Login,
    email: &Email,
) -> AuthResult<()> {
    if repo.find_user_by_login(login.as_str()).await?.is_some() {
        return Err(AuthError::LoginTaken);
    }
    if repo.find_user_by_email(email.as_str()).await?.is_some() {
        return Err(AuthError::EmailTaken);
    }
    Ok(())
}

/// Apply the password policy, then hash. Policy failures are reported on `field`.
pub(crate) fn hash_new_password(raw: String, field: &str) -> AuthResult<HashedPassword> {
    let password = ClearTextPassword::new(raw).map_err(|e| {
        AuthError::App(AppError::validation(vec![FieldError::new(field, e.to_string())]))
    })?;
    Ok(password.hash()?)
}

pub struct CreateUserUseCase<R: AuthStore> {
    repo: Arc<R>,
}

impl<R: AuthStore> CreateUserUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Created by an administrator, so already confirmed
    pub async fn execute(&self, input: NewUserInput) -> AuthResult<User> {
        let login = Login::new(input.login)?;
        let email = Email::new(input.email)?;
        ensure_available(self.repo.as_ref(), &login, &email).await?;

        let password_hash = hash_new_password(input.password, "password")?;
        let user = User::create_confirmed(login, email, password_hash, kernel::time::now());
        self.repo.insert_user(&user).await?;

        tracing::info!(user_id = %user.id, login = %user.login, "User created by admin");
        Ok(user)
    }
}

pub struct ListUsersUseCase<R: AuthStore> {
    repo: Arc<R>,
}

impl<R: AuthStore> ListUsersUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        filter: UserFilter,
        query: PageQuery<UserSortBy>,
    ) -> AuthResult<Paginator<User>> {
        let (items, total) = self.repo.list_users(&filter, &query).await?;
        Ok(Paginator::new(&query, total, items))
    }
}

pub struct DeleteUserUseCase<R: AuthStore> {
    repo: Arc<R>,
}

impl<R: AuthStore> DeleteUserUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Removes the user together with all of their device sessions
    pub async fn execute(&self, user_id: UserId) -> AuthResult<()> {
        if !self.repo.delete_user(&user_id).await? {
            return Err(AuthError::UserNotFound);
        }
        let sessions = self.repo.delete_user_sessions(&user_id).await?;
        tracing::info!(user_id = %user_id, sessions_deleted = sessions, "User deleted");
        Ok(())
    }
}

/// Profile of the bearer-authenticated user
pub struct GetMeUseCase<R: AuthStore> {
    repo: Arc<R>,
}

impl<R: AuthStore> GetMeUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// A token for a user that no longer exists is treated as unauthorized
    pub async fn execute(&self, user_id: UserId) -> AuthResult<User> {
        self.repo
            .find_user(&user_id)
            .await?
            .ok_or(AuthError::Unauthorized)
    }
}
