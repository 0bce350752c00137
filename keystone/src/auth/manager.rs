//! Authentication manager implementation.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::{
    errors::{AuthError, AuthResult, FieldError},
    hasher::PasswordHasher,
    models::{LoginRequest, RegisterRequest, TokenPair, UserId, UserProfile},
    tokens::{TokenCodec, TokenKind},
};
use crate::db::repository::{RefreshTokenRepository, UserRepository};

/// Authentication manager
///
/// Orchestrates registration, login, token refresh and access-token
/// verification against the credential store. Holds no mutable state
/// between requests; every operation re-reads the store, which is what
/// makes rotation detection correct when requests overlap.
#[derive(Clone)]
pub struct AuthManager {
    users: Arc<dyn UserRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    hasher: Arc<dyn PasswordHasher>,
    codec: TokenCodec,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `users` - User record store
    /// * `refresh_tokens` - Store for the single current refresh token per user
    /// * `hasher` - Password hasher
    /// * `codec` - Signed token codec
    pub fn new(
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        hasher: Arc<dyn PasswordHasher>,
        codec: TokenCodec,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            hasher,
            codec,
        }
    }

    /// Register a new user and log them in
    ///
    /// # Errors
    ///
    /// * `AuthError::Validation` - One or more fields failed validation
    /// * `AuthError::DuplicateUser` - A user with this email already exists
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<TokenPair> {
        validate_registration(&request)?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AuthError::DuplicateUser);
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = self
            .users
            .create_user(&request.name, &request.email, &password_hash)
            .await?;

        self.issue_session(user.id).await
    }

    /// Login a user
    ///
    /// # Errors
    ///
    /// * `AuthError::Validation` - Malformed email or empty password
    /// * `AuthError::InvalidCredentials` - Unknown email or wrong password;
    ///   callers cannot tell which
    pub async fn login(&self, request: LoginRequest) -> AuthResult<TokenPair> {
        validate_login(&request)?;

        let user = match self.users.find_by_email(&request.email).await? {
            Some(user) => user,
            None => return Err(AuthError::InvalidCredentials),
        };

        if !self.hasher.verify(&request.password, &user.password_hash) {
            warn!(user_id = user.id, "login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_session(user.id).await
    }

    /// Exchange a refresh token for a new access/refresh pair
    ///
    /// The presented token must verify as refresh kind and must exactly
    /// match the user's stored current token. A token that was already
    /// rotated, or superseded by a newer login, stays invalid forever even
    /// while cryptographically sound and unexpired.
    ///
    /// # Errors
    ///
    /// * `AuthError::Unauthenticated` - No token supplied
    /// * `AuthError::InvalidToken` - Malformed, expired, or wrong-kind token
    /// * `AuthError::TokenRotatedOrRevoked` - Token is no longer current
    /// * `AuthError::Storage` - The rotation write failed; no tokens are
    ///   handed out in that case
    pub async fn refresh(&self, presented: Option<&str>) -> AuthResult<TokenPair> {
        let presented = presented.ok_or(AuthError::Unauthenticated)?;

        let claims = self
            .codec
            .verify(presented, TokenKind::Refresh)
            .map_err(|_| AuthError::InvalidToken)?;
        let user_id = claims.user.id;

        match self.refresh_tokens.find_by_user_id(user_id).await? {
            Some(record) if record.token == presented => {}
            _ => {
                warn!(user_id, "refresh rejected: token rotated or unknown");
                return Err(AuthError::TokenRotatedOrRevoked);
            }
        }

        let pair = self.codec.issue_pair(user_id)?;

        // Unlike login and register, this write must land: handing out a
        // refresh token the store does not consider current would desync
        // rotation tracking permanently.
        self.refresh_tokens
            .upsert(user_id, &pair.refresh_token, Utc::now())
            .await?;

        Ok(pair)
    }

    /// Verify an access token and return the user id it was issued for
    ///
    /// No store lookup is involved; possession of a valid unexpired access
    /// token is sufficient.
    ///
    /// # Errors
    ///
    /// * `AuthError::Unauthenticated` - No token supplied
    /// * `AuthError::InvalidToken` - Verification failed
    pub fn authenticate(&self, token: Option<&str>) -> AuthResult<UserId> {
        let token = token.ok_or(AuthError::Unauthenticated)?;

        let claims = self
            .codec
            .verify(token, TokenKind::Access)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(claims.user.id)
    }

    /// Fetch the profile of an authenticated user
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidToken` - The id from a verified token no longer
    ///   resolves to a user
    pub async fn current_user(&self, user_id: UserId) -> AuthResult<UserProfile> {
        match self.users.find_by_id(user_id).await? {
            Some(user) => Ok(user.profile()),
            None => Err(AuthError::InvalidToken),
        }
    }

    /// Issue a fresh pair and record the refresh token, best effort.
    ///
    /// A failed record write is logged and swallowed: the issued tokens are
    /// valid regardless, and the missing record only affects future refresh
    /// calls, which will ask the caller to log in again.
    async fn issue_session(&self, user_id: UserId) -> AuthResult<TokenPair> {
        let pair = self.codec.issue_pair(user_id)?;

        if let Err(err) = self
            .refresh_tokens
            .upsert(user_id, &pair.refresh_token, Utc::now())
            .await
        {
            warn!(user_id, error = %err, "failed to record refresh token");
        }

        Ok(pair)
    }
}

/// Minimum password length accepted at registration
const MIN_PASSWORD_LEN: usize = 6;

fn validate_registration(request: &RegisterRequest) -> AuthResult<()> {
    let mut errors = Vec::new();

    if request.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if !is_valid_email(&request.email) {
        errors.push(FieldError::new("email", "Please include a valid email"));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            "Please enter a password with 6 or more characters",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(errors))
    }
}

fn validate_login(request: &LoginRequest) -> AuthResult<()> {
    let mut errors = Vec::new();

    if !is_valid_email(&request.email) {
        errors.push(FieldError::new("email", "Please include a valid email"));
    }
    if request.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(errors))
    }
}

/// Pragmatic email check: one '@', non-empty local part, dotted domain,
/// no whitespace.
fn is_valid_email(value: &str) -> bool {
    if value.contains(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_emails() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@x.com."));
        assert!(!is_valid_email("a b@x.com"));
    }

    #[test]
    fn registration_collects_every_field_failure() {
        let request = RegisterRequest {
            name: "  ".to_string(),
            email: "nope".to_string(),
            password: "short".to_string(),
        };

        let err = validate_registration(&request).unwrap_err();
        let AuthError::Validation(errors) = err else {
            panic!("expected validation error");
        };

        assert_eq!(errors.len(), 3);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "password"]);
    }

    #[test]
    fn registration_password_boundary() {
        let base = RegisterRequest {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password: "123456".to_string(),
        };
        assert!(validate_registration(&base).is_ok());

        let short = RegisterRequest {
            password: "12345".to_string(),
            ..base
        };
        assert!(validate_registration(&short).is_err());
    }

    #[test]
    fn login_requires_some_password() {
        let request = LoginRequest {
            email: "a@x.com".to_string(),
            password: String::new(),
        };

        let err = validate_login(&request).unwrap_err();
        let AuthError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors[0].msg, "Password is required");
    }
}
