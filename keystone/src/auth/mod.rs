//! Authentication module providing user registration, login, and rotating
//! refresh tokens.
//!
//! This module implements token-based authentication with:
//! - Argon2id password hashing with server-side pepper
//! - Short-lived JWT access tokens
//! - Long-lived JWT refresh tokens, exactly one live per user, rotated on
//!   every login and refresh
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chrono::Duration;
//! use keystone::auth::{Argon2Hasher, AuthManager, RegisterRequest, TokenCodec, TokenConfig};
//! use keystone::db::memory::{InMemoryRefreshTokenRepository, InMemoryUserRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let codec = TokenCodec::new(TokenConfig {
//!         access_secret: "access_secret_0123456789_0123456789".to_string(),
//!         refresh_secret: "refresh_secret_0123456789_012345678".to_string(),
//!         access_ttl: Duration::minutes(15),
//!         refresh_ttl: Duration::days(7),
//!     });
//!     let auth = AuthManager::new(
//!         Arc::new(InMemoryUserRepository::new()),
//!         Arc::new(InMemoryRefreshTokenRepository::new()),
//!         Arc::new(Argon2Hasher::new("secret_pepper".to_string())),
//!         codec,
//!     );
//!
//!     let request = RegisterRequest {
//!         name: "Player One".to_string(),
//!         email: "player@example.com".to_string(),
//!         password: "secret1".to_string(),
//!     };
//!
//!     let tokens = auth.register(request).await?;
//!     println!("access token: {}", tokens.access_token);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod hasher;
pub mod manager;
pub mod models;
pub mod tokens;

pub use errors::{AuthError, AuthResult, FieldError};
pub use hasher::{Argon2Hasher, PasswordHasher};
pub use manager::AuthManager;
pub use models::{
    LoginRequest, RefreshTokenRecord, RegisterRequest, TokenClaims, TokenPair, TokenUser, User,
    UserId, UserProfile,
};
pub use tokens::{TokenCodec, TokenConfig, TokenError, TokenKind};
