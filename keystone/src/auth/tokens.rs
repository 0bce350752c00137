//! Signed token codec for the two token kinds.
//!
//! Access and refresh tokens are compact, self-contained JWTs carrying the
//! same claim shape but signed with distinct secrets and lifetimes. The
//! distinct secrets are what make the kinds non-interchangeable: a refresh
//! token presented for access verification fails its signature check, and
//! vice versa.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;
use uuid::Uuid;

use super::models::{TokenClaims, TokenPair, TokenUser, UserId};

/// Which of the two configured secrets/lifetimes a token is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived, authorizes API calls
    Access,
    /// Long-lived, only ever exchanged for a new pair
    Refresh,
}

/// Signing configuration, one secret and lifetime per kind.
///
/// Constructed once at startup from server configuration and handed to
/// [`TokenCodec::new`]; nothing in this module reads ambient state.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

/// Token verification failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Not parseable as a signed token
    #[error("token is malformed")]
    Malformed,

    /// Past its embedded expiration
    #[error("token is expired")]
    Expired,

    /// Signature does not match the secret for the requested kind
    #[error("token signature is invalid")]
    BadSignature,
}

/// Stateless signer/verifier for access and refresh tokens.
#[derive(Clone)]
pub struct TokenCodec {
    config: TokenConfig,
}

impl TokenCodec {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    fn secret(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => self.config.access_secret.as_bytes(),
            TokenKind::Refresh => self.config.refresh_secret.as_bytes(),
        }
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.config.access_ttl,
            TokenKind::Refresh => self.config.refresh_ttl,
        }
    }

    /// Sign a fresh claim set for `user_id` as `kind`.
    ///
    /// Each call embeds its own timestamps and a unique token id, so no two
    /// issued tokens are ever string-equal.
    pub fn issue(&self, user_id: UserId, kind: TokenKind) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = TokenClaims {
            user: TokenUser { id: user_id },
            iat: now.timestamp(),
            exp: (now + self.ttl(kind)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret(kind)),
        )
    }

    /// Issue an access/refresh pair for the same user.
    pub fn issue_pair(&self, user_id: UserId) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: self.issue(user_id, TokenKind::Access)?,
            refresh_token: self.issue(user_id, TokenKind::Refresh)?,
        })
    }

    /// Verify `token` as `kind` and return its claims.
    ///
    /// Always returns a discriminated result; verification failures are
    /// ordinary values, not panics or exceptions.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret(kind)),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            _ => TokenError::Malformed,
        })
    }
}
