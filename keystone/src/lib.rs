//! # Keystone
//!
//! A user authentication library built around a rotating refresh-token
//! protocol.
//!
//! Keystone issues short-lived access tokens paired with long-lived
//! refresh tokens and tracks exactly one live refresh token per user.
//! Every successful login or refresh replaces the stored token; presenting
//! a superseded token fails permanently, even while it is still
//! cryptographically valid. That replacement rule is the anti-replay core
//! of the library.
//!
//! ## Core Modules
//!
//! - [`auth`]: Auth manager, token codec, password hashing, data models
//! - [`db`]: Credential-store contract with Postgres and in-memory
//!   implementations
//!
//! ## Example
//!
//! ```no_run
//! use keystone::auth::{TokenCodec, TokenConfig, TokenKind};
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(TokenConfig {
//!     access_secret: "access_secret_0123456789_0123456789".to_string(),
//!     refresh_secret: "refresh_secret_0123456789_012345678".to_string(),
//!     access_ttl: Duration::minutes(15),
//!     refresh_ttl: Duration::days(7),
//! });
//!
//! let token = codec.issue(42, TokenKind::Access).unwrap();
//! assert!(codec.verify(&token, TokenKind::Access).is_ok());
//! assert!(codec.verify(&token, TokenKind::Refresh).is_err());
//! ```

/// Authentication manager, token codec and models.
pub mod auth;
pub use auth::{
    Argon2Hasher, AuthError, AuthManager, AuthResult, LoginRequest, PasswordHasher,
    RegisterRequest, TokenCodec, TokenConfig, TokenKind, TokenPair, User, UserId, UserProfile,
};

/// Credential-store contract and implementations.
pub mod db;
pub use db::{Database, DatabaseConfig};
