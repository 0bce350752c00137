//! User registration API handler.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use keystone::auth::RegisterRequest;
use serde::Deserialize;

use super::auth::AuthResponse;
use super::{AppState, error_response};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Register a new user account and log them in.
///
/// Creates the user and immediately issues an access/refresh token pair.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Player One",
///   "email": "player@example.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Field validation failures (reported per field) or
///   an already-registered email
/// - `500 Internal Server Error`: Credential store failure
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Response {
    let request = RegisterRequest {
        name: payload.name,
        email: payload.email,
        password: payload.password,
    };

    match state.auth_manager.register(request).await {
        Ok(pair) => {
            metrics::registrations_total(true);
            (StatusCode::OK, Json(AuthResponse::from(pair))).into_response()
        }
        Err(err) => {
            metrics::registrations_total(false);
            error_response(&err)
        }
    }
}
