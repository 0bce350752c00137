//! Authentication middleware for protected endpoints.
//!
//! Extracts the access token from the `x-auth-token` header, validates it
//! through the auth manager, and injects the authenticated user id into
//! request extensions for downstream handlers.
//!
//! # Extracting User ID
//!
//! In handler functions, extract the user id from request extensions:
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use keystone::auth::UserId;
//!
//! async fn protected_handler(Extension(user_id): Extension<UserId>) -> String {
//!     format!("Authenticated as user {}", user_id)
//! }
//! # let _ = protected_handler;
//! ```

use axum::{extract::{Request, State}, middleware::Next, response::Response};

use super::{AppState, error_response};

/// Header carrying the access token on protected endpoints
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Authentication middleware that validates access tokens and injects the
/// user id.
///
/// # Behavior
///
/// - **Success**: Token valid → injects `UserId` into request extensions →
///   calls next handler
/// - **Missing header**: `401` with "No token, authorization denied"
/// - **Invalid/expired token**: `401` with "Token is not valid"
///
/// No store lookup happens here; a valid unexpired access token is trusted
/// on its own.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    match state.auth_manager.authenticate(token.as_deref()) {
        Ok(user_id) => {
            request.extensions_mut().insert(user_id);
            next.run(request).await
        }
        Err(err) => error_response(&err),
    }
}
