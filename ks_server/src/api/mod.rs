//! HTTP API for the authentication service.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework
//! - **Tower**: Middleware for CORS and request correlation
//! - **JWT**: Token-based authentication with access/refresh tokens
//!
//! # Modules
//!
//! - [`auth`]: Login, token refresh, and the current-user profile
//! - [`users`]: User registration
//! - [`middleware`]: Access-token guard for protected endpoints
//! - [`request_id`]: Request correlation ids
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                  - Health check (public)
//! POST /api/users               - Register user (public)
//! POST /api/auth                - Login (public)
//! POST /api/auth/refresh-token  - Rotate a refresh token (public, token in x-refresh-token header)
//! GET  /api/auth                - Current user profile (requires x-auth-token header)
//! ```
//!
//! # Security
//!
//! - Access tokens are short-lived JWTs carried in the `x-auth-token` header
//! - Refresh tokens are long-lived JWTs carried in the `x-refresh-token`
//!   header and rotated on every use; a superseded token is rejected with
//!   401 even before it expires
//! - Passwords are hashed with Argon2id before storage
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod auth;
pub mod middleware;
pub mod request_id;
pub mod users;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use keystone::auth::{AuthError, AuthManager};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request (cheap due to Arc wrappers).
///
/// # Fields
///
/// - `auth_manager`: Handles registration, login, token rotation
/// - `pool`: Database connection pool for health checks; `None` when the
///   service runs on the in-memory store
#[derive(Clone)]
pub struct AppState {
    pub auth_manager: Arc<AuthManager>,
    pub pool: Option<Arc<PgPool>>,
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// # use ks_server::api::{create_router, AppState};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let state: AppState = unimplemented!();
/// let app = create_router(state);
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    // Public routes (no authentication middleware)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/users", post(users::register))
        .route("/api/auth", post(auth::login))
        .route("/api/auth/refresh-token", post(auth::refresh_token));

    // Protected routes (require a valid access token)
    let protected_routes = Router::new()
        .route("/api/auth", get(auth::current_user))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Map an auth failure onto the wire contract.
///
/// - Validation and credential failures: 400 with an `errors` array so
///   callers get per-field detail
/// - Token failures: 401 with a single `msg`
/// - Infrastructure failures: 500, sanitized
pub(crate) fn error_response(err: &AuthError) -> Response {
    match err {
        AuthError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": errors })),
        )
            .into_response(),
        AuthError::InvalidCredentials | AuthError::DuplicateUser => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": [{ "msg": err.client_message() }] })),
        )
            .into_response(),
        AuthError::Unauthenticated
        | AuthError::InvalidToken
        | AuthError::TokenRotatedOrRevoked => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": err.client_message() })),
        )
            .into_response(),
        AuthError::Storage(_) | AuthError::TokenIssuance(_) | AuthError::Hashing => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "msg": err.client_message() })),
        )
            .into_response(),
    }
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` if the credential store is reachable, or
/// `503 Service Unavailable` otherwise.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_healthy = match &state.pool {
        Some(pool) => sqlx::query("SELECT 1").fetch_one(pool.as_ref()).await.is_ok(),
        // In-memory store has no connection to lose.
        None => true,
    };

    let status_code = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if store_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "store": store_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
