//! Authentication API handlers.
//!
//! This module provides the login, token-refresh and current-user endpoints.
//! All endpoints return JSON responses with either tokens or error messages.
//!
//! # Examples
//!
//! Login:
//! ```bash
//! curl -X POST http://localhost:5000/api/auth \
//!   -H "Content-Type: application/json" \
//!   -d '{"email": "player@example.com", "password": "secret1"}'
//! ```
//!
//! Rotate a refresh token:
//! ```bash
//! curl -X POST http://localhost:5000/api/auth/refresh-token \
//!   -H "x-refresh-token: eyJhbGciOiJIUzI1NiIs..."
//! ```

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use keystone::auth::{AuthError, LoginRequest, UserId};
use serde::{Deserialize, Serialize};

use super::{AppState, error_response};
use crate::{logging, metrics};

/// Header carrying the refresh token on `/api/auth/refresh-token`
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Token pair response; wire keys keep the observed client contract.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<keystone::auth::TokenPair> for AuthResponse {
    fn from(pair: keystone::auth::TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// Authenticate a user and issue a token pair.
///
/// # Response
///
/// On success, returns `200 OK`:
/// ```json
/// {
///   "accessToken": "eyJhbGciOiJIUzI1NiIs...",
///   "refreshToken": "eyJhbGciOiJIUzI1NiIs..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed fields, unknown email, or wrong password.
///   Unknown email and wrong password produce the identical body.
/// - `500 Internal Server Error`: Credential store failure
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Response {
    let request = LoginRequest {
        email: payload.email.clone(),
        password: payload.password,
    };

    match state.auth_manager.login(request).await {
        Ok(pair) => {
            metrics::login_attempts_total(true);
            (StatusCode::OK, Json(AuthResponse::from(pair))).into_response()
        }
        Err(err) => {
            metrics::login_attempts_total(false);
            if matches!(err, AuthError::InvalidCredentials) {
                logging::log_security_event(
                    "failed_login",
                    Some(&payload.email),
                    "Invalid credentials presented",
                );
            }
            error_response(&err)
        }
    }
}

/// Exchange a refresh token for a new access/refresh pair.
///
/// The refresh token is read from the `x-refresh-token` header. On success
/// the presented token is permanently superseded by the returned one.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing header, invalid/expired token, or a token
///   that has already been rotated out
/// - `500 Internal Server Error`: The rotation write failed; no tokens are
///   issued in that case
pub async fn refresh_token(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let presented = headers
        .get(REFRESH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    match state.auth_manager.refresh(presented).await {
        Ok(pair) => {
            metrics::token_refreshes_total(true);
            (StatusCode::OK, Json(AuthResponse::from(pair))).into_response()
        }
        Err(err) => {
            metrics::token_refreshes_total(false);
            if matches!(err, AuthError::TokenRotatedOrRevoked) {
                metrics::refresh_replays_total();
                logging::log_security_event(
                    "token_replay",
                    None,
                    "Superseded refresh token presented",
                );
            }
            error_response(&err)
        }
    }
}

/// Return the authenticated user's profile, without the password hash.
///
/// Requires the auth middleware; the user id arrives through request
/// extensions.
pub async fn current_user(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
) -> Response {
    match state.auth_manager.current_user(user_id).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(err) => error_response(&err),
    }
}
