//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{FromRef, Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use kernel::extract::JsonBody;
use kernel::id::{DeviceId, UserId};
use kernel::pagination::{PageParams, Paginator};
use platform::client::ClientInfo;
use platform::mail::Mailer;

use crate::application::config::{AdminCredentials, AuthConfig};
use crate::application::emails::link_base;
use crate::application::tokens::{TokenPair, TokenService};
use crate::application::{
    ConfirmRegistrationUseCase, CreateUserUseCase, DeleteUserUseCase, GetMeUseCase,
    ListDevicesUseCase, ListUsersUseCase, LoginUseCase, LogoutUseCase, NewPasswordUseCase,
    RefreshTokensUseCase, RegisterUseCase, RequestRecoveryUseCase, ResendConfirmationUseCase,
    TerminateDeviceUseCase, TerminateOtherDevicesUseCase,
};
use crate::domain::repository::AuthStore;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccessTokenResponse, DeviceView, MeResponse, UserSearchParams, UserView, parse_confirmation_code,
    parse_email, parse_login, parse_new_password, parse_new_user,
};
use crate::presentation::extract::{CurrentUser, RefreshSession, SuperAdmin};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R: AuthStore> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
    pub admin: Arc<AdminCredentials>,
    pub mailer: Arc<Mailer>,
}

impl<R: AuthStore> AuthAppState<R> {
    pub fn new(repo: Arc<R>, config: AuthConfig, mailer: Arc<Mailer>) -> Self {
        let tokens = Arc::new(TokenService::new(&config));
        let admin = Arc::new(config.admin.clone());
        Self {
            repo,
            config: Arc::new(config),
            tokens,
            admin,
            mailer,
        }
    }
}

impl<R: AuthStore> FromRef<AuthAppState<R>> for Arc<TokenService> {
    fn from_ref(state: &AuthAppState<R>) -> Self {
        state.tokens.clone()
    }
}

impl<R: AuthStore> FromRef<AuthAppState<R>> for Arc<AdminCredentials> {
    fn from_ref(state: &AuthAppState<R>) -> Self {
        state.admin.clone()
    }
}

fn request_link_base(config: &AuthConfig, headers: &HeaderMap) -> String {
    let host = headers.get(header::HOST).and_then(|h| h.to_str().ok());
    link_base(config, host)
}

/// `200 {accessToken}` plus the rotated refresh cookie
fn token_response(config: &AuthConfig, pair: TokenPair) -> AuthResult<Response> {
    let cookie: HeaderValue = config
        .refresh_cookie()
        .set_cookie_header(&pair.refresh_token)
        .ok_or_else(|| AppError::internal("Refresh token is not a valid cookie value"))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AccessTokenResponse {
            access_token: pair.access_token,
        }),
    )
        .into_response())
}

// ============================================================================
// Login / Refresh / Logout
// ============================================================================

/// POST /auth/login
pub async fn login<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    client: ClientInfo,
    body: JsonBody,
) -> AuthResult<Response> {
    let input = parse_login(&body)?;
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.tokens.clone(),
    );
    let pair = use_case.execute(input, client).await?;
    token_response(&state.config, pair)
}

/// POST /auth/refresh-token
pub async fn refresh_token<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    RefreshSession(session): RefreshSession,
) -> AuthResult<Response> {
    let use_case = RefreshTokensUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.tokens.clone(),
    );
    let pair = use_case.execute(session).await?;
    token_response(&state.config, pair)
}

/// POST /auth/logout
pub async fn logout<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    RefreshSession(session): RefreshSession,
) -> AuthResult<impl IntoResponse> {
    LogoutUseCase::new(state.repo.clone()).execute(session).await?;

    let cookie = state
        .config
        .refresh_cookie()
        .delete_cookie_header()
        .ok_or_else(|| AppError::internal("Invalid cookie attributes"))?;
    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

/// GET /auth/me
pub async fn me<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(user_id): CurrentUser,
) -> AuthResult<Json<MeResponse>> {
    let user = GetMeUseCase::new(state.repo.clone()).execute(user_id).await?;
    Ok(Json(MeResponse::from(&user)))
}

// ============================================================================
// Registration
// ============================================================================

/// POST /auth/registration
pub async fn registration<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    body: JsonBody,
) -> AuthResult<StatusCode> {
    let input = parse_new_user(&body)?;
    let base = request_link_base(&state.config, &headers);
    RegisterUseCase::new(state.repo.clone(), state.config.clone(), state.mailer.clone())
        .execute(input, &base)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /auth/registration-confirmation
pub async fn registration_confirmation<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    body: JsonBody,
) -> AuthResult<StatusCode> {
    let code = parse_confirmation_code(&body)?;
    ConfirmRegistrationUseCase::new(state.repo.clone())
        .execute(&code)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /auth/registration-email-resending
pub async fn registration_email_resending<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    body: JsonBody,
) -> AuthResult<StatusCode> {
    let email = parse_email(&body)?;
    let base = request_link_base(&state.config, &headers);
    ResendConfirmationUseCase::new(state.repo.clone(), state.config.clone(), state.mailer.clone())
        .execute(&email, &base)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Password Recovery
// ============================================================================

/// POST /auth/password-recovery
pub async fn password_recovery<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    body: JsonBody,
) -> AuthResult<StatusCode> {
    let email = parse_email(&body)?;
    let base = request_link_base(&state.config, &headers);
    RequestRecoveryUseCase::new(state.repo.clone(), state.config.clone(), state.mailer.clone())
        .execute(&email, &base)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /auth/new-password
pub async fn new_password<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    body: JsonBody,
) -> AuthResult<StatusCode> {
    let request = parse_new_password(&body)?;
    NewPasswordUseCase::new(state.repo.clone())
        .execute(&request.recovery_code, request.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Security Devices
// ============================================================================

/// GET /security/devices
pub async fn list_devices<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    RefreshSession(session): RefreshSession,
) -> AuthResult<Json<Vec<DeviceView>>> {
    let sessions = ListDevicesUseCase::new(state.repo.clone())
        .execute(&session)
        .await?;
    Ok(Json(sessions.into_iter().map(DeviceView::from).collect()))
}

/// DELETE /security/devices
pub async fn terminate_other_devices<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    RefreshSession(session): RefreshSession,
) -> AuthResult<StatusCode> {
    TerminateOtherDevicesUseCase::new(state.repo.clone())
        .execute(&session)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /security/devices/{deviceId}
pub async fn terminate_device<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    RefreshSession(session): RefreshSession,
    Path(device_id): Path<String>,
) -> AuthResult<StatusCode> {
    let device_id = DeviceId::parse(&device_id).ok_or(AuthError::DeviceNotFound)?;
    TerminateDeviceUseCase::new(state.repo.clone())
        .execute(&session, device_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Users (admin)
// ============================================================================

/// GET /users
pub async fn list_users<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    _admin: SuperAdmin,
    Query(page): Query<PageParams>,
    Query(search): Query<UserSearchParams>,
) -> AuthResult<Json<Paginator<UserView>>> {
    let page = ListUsersUseCase::new(state.repo.clone())
        .execute(search.into(), page.resolve())
        .await?;
    Ok(Json(page.map(UserView::from)))
}

/// POST /users
pub async fn create_user<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    _admin: SuperAdmin,
    body: JsonBody,
) -> AuthResult<impl IntoResponse> {
    let input = parse_new_user(&body)?;
    let user = CreateUserUseCase::new(state.repo.clone())
        .execute(input)
        .await?;
    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

/// DELETE /users/{id}
pub async fn delete_user<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    _admin: SuperAdmin,
    Path(id): Path<String>,
) -> AuthResult<StatusCode> {
    let user_id = UserId::parse(&id).ok_or(AuthError::UserNotFound)?;
    DeleteUserUseCase::new(state.repo.clone())
        .execute(user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_sets_cookie_and_body() {
        let config = AuthConfig::development();
        let response = token_response(
            &config,
            TokenPair {
                access_token: "access".to_string(),
                refresh_token: "refresh".to_string(),
            },
        )
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("refreshToken=refresh;"));
        assert!(cookie.contains("HttpOnly"));
    }
}
