//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::net::SocketAddr;
use std::sync::Arc;

use api::{ApiConfig, build_app};
use auth::domain::repository::DeviceSessionRepository;
use auth::{InMemoryAuthRepository, PgAuthRepository};
use axum::{
    Router, http,
    http::{Method, header},
};
use blog::{InMemoryBlogRepository, PgBlogRepository};
use platform::mail::Mailer;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,blog=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();
    let mailer = Arc::new(Mailer::from_config(&config.mailer));

    let app = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            let users = PgAuthRepository::new(pool.clone());

            // Startup cleanup: errors here should not prevent server startup
            match users.delete_expired_sessions(kernel::time::now()).await {
                Ok(sessions) => {
                    tracing::info!(sessions_deleted = sessions, "Device session cleanup completed");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Device session cleanup failed, continuing anyway");
                }
            }

            build_app(
                &config,
                Arc::new(users),
                Arc::new(PgBlogRepository::new(pool)),
                mailer,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; data lives in memory only");
            build_app(
                &config,
                Arc::new(InMemoryAuthRepository::new()),
                Arc::new(InMemoryBlogRepository::new()),
                mailer,
            )
        }
    };

    let app = with_http_layers(app, &config.frontend_origins);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn with_http_layers(app: Router, frontend_origins: &[String]) -> Router {
    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    app.layer(TraceLayer::new_for_http()).layer(cors)
}
