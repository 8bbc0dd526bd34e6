//! Login Use Case
//!
//! Verifies credentials and opens a device session.

use std::sync::Arc;

use platform::client::ClientInfo;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::tokens::{TokenPair, TokenService};
use crate::domain::entity::device_session::DeviceSession;
use crate::domain::repository::{AuthStore, DeviceSessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    /// Login or email
    pub login_or_email: String,
    pub password: String,
}

pub struct LoginUseCase<R: AuthStore> {
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    tokens: Arc<TokenService>,
}

impl<R: AuthStore> LoginUseCase<R> {
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, tokens: Arc<TokenService>) -> Self {
        Self {
            repo,
            config,
            tokens,
        }
    }

    /// Unconfirmed users may log in
    pub async fn execute(&self, input: LoginInput, client: ClientInfo) -> AuthResult<TokenPair> {
        let user = self
            .repo
            .find_user_by_login_or_email(&input.login_or_email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = ClearTextPassword::for_verification(input.password);
        if !user.password_hash.verify(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        let session = DeviceSession::start(
            user.id,
            client.ip,
            client.title,
            kernel::time::now(),
            self.config.session_ttl(),
        );
        self.repo.insert_session(&session).await?;
        let pair = self.tokens.issue_pair(&session)?;

        tracing::info!(
            user_id = %user.id,
            device_id = %session.device_id,
            ip = %session.ip,
            "User logged in"
        );
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::users::{CreateUserUseCase, NewUserInput};
    use crate::infra::memory::InMemoryAuthRepository;

    fn client() -> ClientInfo {
        ClientInfo {
            ip: "10.0.0.1".to_string(),
            title: "Chrome".to_string(),
        }
    }

    fn login(login_or_email: &str, password: &str) -> LoginInput {
        LoginInput {
            login_or_email: login_or_email.to_string(),
            password: password.to_string(),
        }
    }

    async fn setup() -> (Arc<InMemoryAuthRepository>, LoginUseCase<InMemoryAuthRepository>) {
        let repo = Arc::new(InMemoryAuthRepository::new());
        CreateUserUseCase::new(repo.clone())
            .execute(NewUserInput {
                login: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "qwerty1".to_string(),
            })
            .await
            .unwrap();
        let config = Arc::new(AuthConfig::default());
        let tokens = Arc::new(TokenService::new(&config));
        let use_case = LoginUseCase::new(repo.clone(), config, tokens);
        (repo, use_case)
    }

    #[tokio::test]
    async fn test_login_by_login_or_email_opens_sessions() {
        let (repo, use_case) = setup().await;
        use_case.execute(login("alice", "qwerty1"), client()).await.unwrap();
        use_case
            .execute(login("alice@example.com", "qwerty1"), client())
            .await
            .unwrap();

        let user = repo.find_user_by_login("alice").await.unwrap().unwrap();
        let sessions = repo.list_sessions(&user.id, kernel::time::now()).await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].title, "Chrome");
        assert_eq!(sessions[0].ip, "10.0.0.1");
    }

    #[tokio::test]
    async fn test_wrong_credentials() {
        let (_, use_case) = setup().await;
        assert!(matches!(
            use_case.execute(login("alice", "wrong-pass"), client()).await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            use_case.execute(login("bob", "qwerty1"), client()).await,
            Err(AuthError::InvalidCredentials)
        ));
    }
}
