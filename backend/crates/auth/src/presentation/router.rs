//! Auth Routers

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use platform::rate_limit::{RateLimitStore, RateLimiter, enforce_rate_limit};

use crate::domain::repository::AuthStore;
use crate::presentation::handlers::{self, AuthAppState};

/// `/auth` routes. Credential and email endpoints go through `limiter`.
pub fn auth_router<R, L>(state: AuthAppState<R>, limiter: RateLimiter<L>) -> Router
where
    R: AuthStore,
    L: RateLimitStore + Send + Sync + 'static,
{
    let limited = Router::new()
        .route("/login", post(handlers::login::<R>))
        .route("/registration", post(handlers::registration::<R>))
        .route(
            "/registration-confirmation",
            post(handlers::registration_confirmation::<R>),
        )
        .route(
            "/registration-email-resending",
            post(handlers::registration_email_resending::<R>),
        )
        .route("/password-recovery", post(handlers::password_recovery::<R>))
        .route("/new-password", post(handlers::new_password::<R>))
        .route_layer(middleware::from_fn_with_state(
            limiter,
            enforce_rate_limit::<L>,
        ));

    Router::new()
        .route("/refresh-token", post(handlers::refresh_token::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route("/me", get(handlers::me::<R>))
        .merge(limited)
        .with_state(state)
}

/// `/users` routes (HTTP Basic administrator)
pub fn users_router<R: AuthStore>(state: AuthAppState<R>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_users::<R>).post(handlers::create_user::<R>),
        )
        .route("/{id}", delete(handlers::delete_user::<R>))
        .with_state(state)
}

/// `/security/devices` routes (refresh-token cookie)
pub fn devices_router<R: AuthStore>(state: AuthAppState<R>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_devices::<R>).delete(handlers::terminate_other_devices::<R>),
        )
        .route("/{deviceId}", delete(handlers::terminate_device::<R>))
        .with_state(state)
}
