//! # HTTP API
//!
//! axum front end over the core. The service is stateless apart from an
//! immutable [`AppState`]: request bodies carry the profile snapshots.
//!
//! | Route | |
//! |-------|---|
//! | `GET /health` | liveness, no auth |
//! | `POST /scan` | validation issues + summary |
//! | `POST /coverage` | administrator coverage |
//! | `POST /access` | single permission lookup |
//! | `GET /capabilities/{role}` | derived capability flags |
//! | `GET /matrix/{role}` | every grant for a role |
//! | `POST /autofix` | patch for one issue |
//! | `GET /settings` | active portal settings |
//!
//! Every error body is `{error, code}`; unreadable request bodies answer
//! 400 `BAD_REQUEST`.

mod handlers;
mod middleware;

pub use handlers::{AccessRequest, AccessResponse, HealthResponse};

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dfs_core::{CoreError, PortalSettings, Scanner};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

// =============================================================================
// STATE
// =============================================================================

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    pub scanner: Scanner,
    api_key: Option<Arc<str>>,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl AppState {
    #[must_use]
    pub fn new(settings: PortalSettings, api_key: Option<String>, rate_limit_per_sec: u32) -> Self {
        let per_second = NonZeroU32::new(rate_limit_per_sec).unwrap_or(NonZeroU32::MIN);
        Self {
            scanner: Scanner::new(settings),
            api_key: api_key.filter(|key| !key.is_empty()).map(Arc::from),
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(per_second))),
        }
    }

    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.settings,
            config.api_key.clone(),
            config.rate_limit_per_sec,
        )
    }

    #[must_use]
    pub fn settings(&self) -> &PortalSettings {
        self.scanner.settings()
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Errors returned to HTTP clients as `{error, code}`.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    RateLimited,
    /// Body missing, not JSON, or not the expected shape.
    BadRequest(String),
    Core(CoreError),
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        Self::Core(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, code) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "missing or invalid API key".to_string(),
                "UNAUTHORIZED",
            ),
            Self::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate limit exceeded".to_string(),
                "RATE_LIMITED",
            ),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone(), "BAD_REQUEST"),
            Self::Core(e) => {
                let status = match e {
                    CoreError::UnknownRole(_) => StatusCode::NOT_FOUND,
                    CoreError::UnknownFeature(_) | CoreError::UnknownAction(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    CoreError::NotAutoFixable { .. } | CoreError::MissingTarget(_) => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                };
                (status, e.to_string(), e.code())
            }
        };
        (
            status,
            Json(serde_json::json!({ "error": message, "code": code })),
        )
            .into_response()
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/scan", post(handlers::scan))
        .route("/coverage", post(handlers::coverage))
        .route("/access", post(handlers::access))
        .route("/capabilities/{role}", get(handlers::capabilities))
        .route("/matrix/{role}", get(handlers::matrix))
        .route("/autofix", post(handlers::autofix))
        .route("/settings", get(handlers::settings))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_api_key,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> AppResult<()> {
    let addr = config.addr()?;
    let state = AppState::from_config(&config);
    if config.api_key.is_none() {
        tracing::warn!("No API key configured; the API is unauthenticated");
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Server(format!("failed to bind {addr}: {e}")))?;
    info!("DFS API listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
