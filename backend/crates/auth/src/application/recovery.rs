//! Password Recovery Use Cases

use std::sync::Arc;

use platform::mail::Mailer;

use crate::application::config::AuthConfig;
use crate::application::emails::recovery_email;
use crate::application::users::hash_new_password;
use crate::domain::repository::{AuthStore, UserRepository};
use crate::error::{AuthError, AuthResult};

pub struct RequestRecoveryUseCase<R: AuthStore> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    mailer: Arc<Mailer>,
}

impl<R: AuthStore> RequestRecoveryUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, mailer: Arc<Mailer>) -> Self {
        Self {
            repo,
            config,
            mailer,
        }
    }

    /// Succeeds whether or not the email is registered
    pub async fn execute(&self, email: &str, link_base: &str) -> AuthResult<()> {
        let Some(mut user) = self.repo.find_user_by_email(email).await? else {
            tracing::debug!("Password recovery requested for unknown email");
            return Ok(());
        };

        let code = user
            .start_recovery(kernel::time::now(), self.config.recovery_code_ttl())
            .code
            .clone();
        self.repo.update_user(&user).await?;

        self.mailer
            .dispatch(recovery_email(user.email.as_str(), link_base, &code));

        tracing::info!(user_id = %user.id, "Password recovery started");
        Ok(())
    }
}

pub struct NewPasswordUseCase<R: AuthStore> {
    repo: Arc<R>,
}

impl<R: AuthStore> NewPasswordUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, recovery_code: &str, new_password: String) -> AuthResult<()> {
        let mut user = self
            .repo
            .find_user_by_recovery_code(recovery_code)
            .await?
            .ok_or(AuthError::InvalidRecoveryCode)?;

        let new_hash = hash_new_password(new_password, "newPassword")?;
        if !user.reset_password(recovery_code, kernel::time::now(), new_hash) {
            return Err(AuthError::InvalidRecoveryCode);
        }
        self.repo.update_user(&user).await?;

        tracing::info!(user_id = %user.id, "Password changed via recovery");
        Ok(())
    }
}
