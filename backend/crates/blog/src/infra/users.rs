//! User lookups backed by the auth store

use auth::AuthStore;
use auth::domain::repository::UserRepository;
use kernel::id::UserId;

use crate::domain::repository::UserDirectory;
use crate::error::BlogResult;

impl<T: AuthStore> UserDirectory for T {
    async fn login_of(&self, user_id: &UserId) -> BlogResult<Option<String>> {
        let user = UserRepository::find_user(self, user_id).await?;
        Ok(user.map(|u| u.login.as_str().to_string()))
    }
}
