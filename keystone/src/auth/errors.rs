//! Authentication error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::repository::StorageError;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending request field
    pub field: String,
    /// Human-readable message
    pub msg: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            msg: msg.into(),
        }
    }
}

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more request fields failed validation
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Unknown email or wrong password; a single variant for both so
    /// callers cannot enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A user with this email already exists
    #[error("User already exists.")]
    DuplicateUser,

    /// No token was supplied
    #[error("No token, authorization denied")]
    Unauthenticated,

    /// Token is malformed, expired, or signed for the wrong kind
    #[error("Token is not valid")]
    InvalidToken,

    /// Presented refresh token is no longer the user's current one
    #[error("Refresh token has been superseded")]
    TokenRotatedOrRevoked,

    /// Credential store failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Token signing failed
    #[error("Token issuance error: {0}")]
    TokenIssuance(#[from] jsonwebtoken::errors::Error),

    /// Password hashing failed
    #[error("Password hashing failed")]
    Hashing,
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Storage, signing and hashing errors are sanitized so nothing about
    /// the internal system structure reaches a client.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Storage(_) | AuthError::TokenIssuance(_) | AuthError::Hashing => {
                "Server Error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_sanitized() {
        let err = AuthError::Storage(StorageError::Unavailable("pool exhausted".to_string()));
        assert_eq!(err.client_message(), "Server Error");
        assert!(err.to_string().contains("pool exhausted"));
    }

    #[test]
    fn credential_errors_surface_verbatim() {
        assert_eq!(
            AuthError::InvalidCredentials.client_message(),
            "Invalid credentials"
        );
        assert_eq!(
            AuthError::Unauthenticated.client_message(),
            "No token, authorization denied"
        );
        assert_eq!(AuthError::InvalidToken.client_message(), "Token is not valid");
    }
}
