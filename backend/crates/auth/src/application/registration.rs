//! Registration Use Cases
//!
//! Self-registration with email confirmation.

use std::sync::Arc;

use platform::mail::Mailer;

use crate::application::config::AuthConfig;
use crate::application::emails::registration_email;
use crate::application::users::{NewUserInput, ensure_available, hash_new_password};
use crate::domain::entity::user::User;
use crate::domain::repository::{AuthStore, UserRepository};
use crate::domain::value_object::{email::Email, login::Login};
use crate::error::{AuthError, AuthResult};

/// Register use case
pub struct RegisterUseCase<R: AuthStore> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    mailer: Arc<Mailer>,
}

impl<R: AuthStore> RegisterUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, mailer: Arc<Mailer>) -> Self {
        Self {
            repo,
            config,
            mailer,
        }
    }

    /// Creates an unconfirmed user and mails the confirmation link.
    /// `link_base` prefixes the link.
    pub async fn execute(&self, input: NewUserInput, link_base: &str) -> AuthResult<User> {
        let login = Login::new(input.login)?;
        let email = Email::new(input.email)?;
        ensure_available(self.repo.as_ref(), &login, &email).await?;

        let password_hash = hash_new_password(input.password, "password")?;
        let user = User::register(
            login,
            email,
            password_hash,
            kernel::time::now(),
            self.config.confirmation_code_ttl(),
        );
        self.repo.insert_user(&user).await?;

        if let Some(confirmation) = &user.confirmation {
            self.mailer.dispatch(registration_email(
                user.email.as_str(),
                link_base,
                &confirmation.code,
            ));
        }

        tracing::info!(user_id = %user.id, login = %user.login, "User registered");
        Ok(user)
    }
}

/// Confirm registration use case
pub struct ConfirmRegistrationUseCase<R: AuthStore> {
    repo: Arc<R>,
}

impl<R: AuthStore> ConfirmRegistrationUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, code: &str) -> AuthResult<()> {
        let mut user = self
            .repo
            .find_user_by_confirmation_code(code)
            .await?
            .ok_or(AuthError::InvalidConfirmationCode)?;

        if !user.confirm(code, kernel::time::now()) {
            return Err(AuthError::InvalidConfirmationCode);
        }
        self.repo.update_user(&user).await?;

        tracing::info!(user_id = %user.id, "Email confirmed");
        Ok(())
    }
}

/// Resend confirmation use case
pub struct ResendConfirmationUseCase<R: AuthStore> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    mailer: Arc<Mailer>,
}

impl<R: AuthStore> ResendConfirmationUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, mailer: Arc<Mailer>) -> Self {
        Self {
            repo,
            config,
            mailer,
        }
    }

    /// Issues a new code; the previous one stops working
    pub async fn execute(&self, email: &str, link_base: &str) -> AuthResult<()> {
        let mut user = self
            .repo
            .find_user_by_email(email)
            .await?
            .ok_or(AuthError::EmailNotFound)?;

        if user.is_confirmed {
            return Err(AuthError::EmailAlreadyConfirmed);
        }

        let code = user
            .renew_confirmation(kernel::time::now(), self.config.confirmation_code_ttl())
            .code
            .clone();
        self.repo.update_user(&user).await?;

        self.mailer
            .dispatch(registration_email(user.email.as_str(), link_base, &code));

        tracing::info!(user_id = %user.id, "Confirmation email resent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryAuthRepository;

    struct Fixture {
        repo: Arc<InMemoryAuthRepository>,
        config: Arc<AuthConfig>,
        mailer: Arc<Mailer>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                repo: Arc::new(InMemoryAuthRepository::new()),
                config: Arc::new(AuthConfig::default()),
                mailer: Arc::new(Mailer::Disabled),
            }
        }

        async fn register(&self) -> User {
            RegisterUseCase::new(self.repo.clone(), self.config.clone(), self.mailer.clone())
                .execute(
                    NewUserInput {
                        login: "alice".to_string(),
                        email: "alice@example.com".to_string(),
                        password: "qwerty1".to_string(),
                    },
                    "https://localhost",
                )
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_register_then_confirm() {
        let fx = Fixture::new();
        let user = fx.register().await;
        assert!(!user.is_confirmed);
        let code = user.confirmation.clone().unwrap().code;

        let confirm = ConfirmRegistrationUseCase::new(fx.repo.clone());
        confirm.execute(&code).await.unwrap();

        let stored = fx.repo.find_user(&user.id).await.unwrap().unwrap();
        assert!(stored.is_confirmed);
        assert!(stored.confirmation.is_none());

        assert!(matches!(
            confirm.execute(&code).await,
            Err(AuthError::InvalidConfirmationCode)
        ));
    }

    #[tokio::test]
    async fn test_resend_replaces_code() {
        let fx = Fixture::new();
        let user = fx.register().await;
        let old_code = user.confirmation.clone().unwrap().code;

        ResendConfirmationUseCase::new(fx.repo.clone(), fx.config.clone(), fx.mailer.clone())
            .execute("alice@example.com", "https://localhost")
            .await
            .unwrap();

        let confirm = ConfirmRegistrationUseCase::new(fx.repo.clone());
        assert!(confirm.execute(&old_code).await.is_err());

        let stored = fx.repo.find_user(&user.id).await.unwrap().unwrap();
        confirm
            .execute(&stored.confirmation.unwrap().code)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_resend_errors() {
        let fx = Fixture::new();
        let resend =
            ResendConfirmationUseCase::new(fx.repo.clone(), fx.config.clone(), fx.mailer.clone());
        assert!(matches!(
            resend.execute("nobody@example.com", "https://localhost").await,
            Err(AuthError::EmailNotFound)
        ));

        let user = fx.register().await;
        ConfirmRegistrationUseCase::new(fx.repo.clone())
            .execute(&user.confirmation.unwrap().code)
            .await
            .unwrap();
        assert!(matches!(
            resend.execute("alice@example.com", "https://localhost").await,
            Err(AuthError::EmailAlreadyConfirmed)
        ));
    }
}
