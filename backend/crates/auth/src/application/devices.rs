//! Security Device Use Cases

use std::sync::Arc;

use kernel::id::DeviceId;

use crate::domain::entity::device_session::DeviceSession;
use crate::domain::repository::{AuthStore, DeviceSessionRepository};
use crate::error::{AuthError, AuthResult};

pub struct ListDevicesUseCase<R: AuthStore> {
    repo: Arc<R>,
}

impl<R: AuthStore> ListDevicesUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Unexpired sessions of the current user
    pub async fn execute(&self, current: &DeviceSession) -> AuthResult<Vec<DeviceSession>> {
        self.repo
            .list_sessions(&current.user_id, kernel::time::now())
            .await
    }
}

pub struct TerminateOtherDevicesUseCase<R: AuthStore> {
    repo: Arc<R>,
}

impl<R: AuthStore> TerminateOtherDevicesUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, current: &DeviceSession) -> AuthResult<()> {
        let deleted = self
            .repo
            .delete_other_sessions(&current.user_id, &current.device_id)
            .await?;
        tracing::info!(user_id = %current.user_id, sessions_deleted = deleted, "Other devices terminated");
        Ok(())
    }
}

pub struct TerminateDeviceUseCase<R: AuthStore> {
    repo: Arc<R>,
}

impl<R: AuthStore> TerminateDeviceUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// 404 for unknown devices, 403 for devices of other users
    pub async fn execute(&self, current: &DeviceSession, device_id: DeviceId) -> AuthResult<()> {
        let target = self
            .repo
            .find_session(&device_id)
            .await?
            .ok_or(AuthError::DeviceNotFound)?;

        if target.user_id != current.user_id {
            return Err(AuthError::DeviceForbidden);
        }

        self.repo.delete_session(&device_id).await?;
        tracing::info!(user_id = %current.user_id, device_id = %device_id, "Device terminated");
        Ok(())
    }
}
