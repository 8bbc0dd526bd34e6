//! Rate Limiting Infrastructure
//!
//! Sliding-window limiter: every attempt is recorded (rejected ones too),
//! attempts older than the window are pruned, and an attempt is rejected
//! when the window then holds more than `max_requests` entries.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use tokio::time::Instant;

use crate::client::ClientInfo;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    /// 5 attempts per 10 seconds
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(10),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Record an attempt under `key` and report whether it is allowed
    async fn check_and_increment(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult;

    /// Forget every recorded attempt
    async fn reset(&self);
}

/// Process-local sliding-window store
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateLimitStore {
    attempts: Arc<DashMap<String, VecDeque<Instant>>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, key: &str, config: &RateLimitConfig, now: Instant) -> RateLimitResult {
        let mut entry = self.attempts.entry(key.to_string()).or_default();
        while entry
            .front()
            .is_some_and(|first| now.duration_since(*first) > config.window)
        {
            entry.pop_front();
        }
        entry.push_back(now);

        let count = u32::try_from(entry.len()).unwrap_or(u32::MAX);
        RateLimitResult {
            allowed: count <= config.max_requests,
            remaining: config.max_requests.saturating_sub(count),
        }
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn check_and_increment(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult {
        self.record(key, config, Instant::now())
    }

    async fn reset(&self) {
        self.attempts.clear();
    }
}

/// Limiter shared by the rate-limited routes
#[derive(Debug)]
pub struct RateLimiter<S = InMemoryRateLimitStore> {
    store: Arc<S>,
    config: RateLimitConfig,
}

impl<S> Clone for RateLimiter<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S: RateLimitStore> RateLimiter<S> {
    pub fn new(store: S, config: RateLimitConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Attempts are counted per client IP and per endpoint path
    pub async fn check(&self, ip: &str, path: &str) -> RateLimitResult {
        let key = format!("{}|{}", ip, path);
        self.store.check_and_increment(&key, &self.config).await
    }

    pub async fn reset(&self) {
        self.store.reset().await;
    }
}

/// Middleware answering `429` once a client exceeds the limit
///
/// ```rust,ignore
/// Router::new()
///     .route("/login", post(login))
///     .route_layer(middleware::from_fn_with_state(limiter, enforce_rate_limit));
/// ```
pub async fn enforce_rate_limit<S>(
    State(limiter): State<RateLimiter<S>>,
    request: Request,
    next: Next,
) -> Response
where
    S: RateLimitStore + Send + Sync + 'static,
{
    let client = ClientInfo::from_parts(request.headers(), request.extensions());
    let path = request.uri().path().to_string();

    let result = limiter.check(&client.ip, &path).await;
    if !result.allowed {
        tracing::warn!(ip = %client.ip, path = %path, "Rate limit exceeded");
        return StatusCode::TOO_MANY_REQUESTS.into_response();
    }

    next.run(request).await
}
