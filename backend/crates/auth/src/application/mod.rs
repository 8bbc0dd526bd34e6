//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod devices;
pub mod emails;
pub mod login;
pub mod recovery;
pub mod registration;
pub mod session;
pub mod tokens;
pub mod users;

// Re-exports
pub use config::{AdminCredentials, AuthConfig};
pub use devices::{ListDevicesUseCase, TerminateDeviceUseCase, TerminateOtherDevicesUseCase};
pub use login::{LoginInput, LoginUseCase};
pub use recovery::{NewPasswordUseCase, RequestRecoveryUseCase};
pub use registration::{ConfirmRegistrationUseCase, RegisterUseCase, ResendConfirmationUseCase};
pub use session::{AuthenticateRefreshUseCase, LogoutUseCase, RefreshTokensUseCase};
pub use tokens::{AccessClaims, RefreshClaims, TokenPair, TokenService};
pub use users::{
    CreateUserUseCase, DeleteUserUseCase, GetMeUseCase, ListUsersUseCase, NewUserInput,
};
