//! Integration tests for the authentication manager.
//!
//! Exercises registration, login, refresh rotation and access-token
//! verification over the in-memory credential store.

use std::sync::Arc;

use chrono::Duration;
use keystone::auth::{
    Argon2Hasher, AuthError, AuthManager, LoginRequest, RegisterRequest, TokenCodec, TokenConfig,
    TokenKind,
};
use keystone::db::memory::{InMemoryRefreshTokenRepository, InMemoryUserRepository};
use keystone::db::repository::UserRepository;

const ACCESS_SECRET: &str = "access_secret_for_tests_0123456789ab";
const REFRESH_SECRET: &str = "refresh_secret_for_tests_0123456789a";

struct TestHarness {
    auth: AuthManager,
    users: Arc<InMemoryUserRepository>,
    refresh_tokens: Arc<InMemoryRefreshTokenRepository>,
}

fn test_token_config() -> TokenConfig {
    TokenConfig {
        access_secret: ACCESS_SECRET.to_string(),
        refresh_secret: REFRESH_SECRET.to_string(),
        access_ttl: Duration::minutes(15),
        refresh_ttl: Duration::days(7),
    }
}

/// Helper to create an auth manager over fresh in-memory stores
fn setup() -> TestHarness {
    let users = Arc::new(InMemoryUserRepository::new());
    let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::new());

    let auth = AuthManager::new(
        users.clone(),
        refresh_tokens.clone(),
        Arc::new(Argon2Hasher::new("test_pepper".to_string())),
        TokenCodec::new(test_token_config()),
    );

    TestHarness {
        auth,
        users,
        refresh_tokens,
    }
}

fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        name: "A".to_string(),
        email: email.to_string(),
        password: "secret1".to_string(),
    }
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn register_returns_tokens_and_stores_one_record() {
    let harness = setup();

    let tokens = harness
        .auth
        .register(register_request("a@x.com"))
        .await
        .expect("registration should succeed");

    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());
    assert_ne!(tokens.access_token, tokens.refresh_token);
    assert_eq!(harness.refresh_tokens.record_count(), 1);
}

#[tokio::test]
async fn duplicate_registration_fails_and_preserves_original() {
    let harness = setup();

    harness
        .auth
        .register(register_request("a@x.com"))
        .await
        .expect("first registration should succeed");

    let original = harness
        .users
        .find_by_email("a@x.com")
        .await
        .unwrap()
        .expect("user should exist");

    let mut second = register_request("a@x.com");
    second.password = "different_password".to_string();
    let result = harness.auth.register(second).await;

    assert!(
        matches!(result.unwrap_err(), AuthError::DuplicateUser),
        "duplicate email should be rejected"
    );

    let after = harness
        .users
        .find_by_email("a@x.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        after.password_hash, original.password_hash,
        "original password hash should be untouched"
    );
}

#[tokio::test]
async fn register_rejects_invalid_fields_with_per_field_messages() {
    let harness = setup();

    let result = harness
        .auth
        .register(RegisterRequest {
            name: String::new(),
            email: "not-an-email".to_string(),
            password: "12345".to_string(),
        })
        .await;

    let AuthError::Validation(errors) = result.unwrap_err() else {
        panic!("expected a validation error");
    };
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().any(|e| e.msg == "Name is required"));
    assert!(errors.iter().any(|e| e.msg == "Please include a valid email"));
    assert!(
        errors
            .iter()
            .any(|e| e.msg == "Please enter a password with 6 or more characters")
    );
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let harness = setup();
    harness
        .auth
        .register(register_request("a@x.com"))
        .await
        .unwrap();

    let unknown_email = harness
        .auth
        .login(login_request("ghost@x.com", "secret1"))
        .await
        .unwrap_err();
    let wrong_password = harness
        .auth
        .login(login_request("a@x.com", "wrong_password"))
        .await
        .unwrap_err();

    assert!(matches!(unknown_email, AuthError::InvalidCredentials));
    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert_eq!(
        unknown_email.client_message(),
        wrong_password.client_message(),
        "unknown email and wrong password must be indistinguishable"
    );
}

#[tokio::test]
async fn login_issues_fresh_pair() {
    let harness = setup();
    harness
        .auth
        .register(register_request("a@x.com"))
        .await
        .unwrap();

    let tokens = harness
        .auth
        .login(login_request("a@x.com", "secret1"))
        .await
        .expect("login should succeed");

    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());
    assert_eq!(harness.refresh_tokens.record_count(), 1);
}

#[tokio::test]
async fn refresh_rotates_and_invalidates_previous_token() {
    let harness = setup();
    let first = harness
        .auth
        .register(register_request("a@x.com"))
        .await
        .unwrap();

    let second = harness
        .auth
        .refresh(Some(&first.refresh_token))
        .await
        .expect("refresh with the current token should succeed");
    assert_ne!(second.refresh_token, first.refresh_token);

    // The rotated-out token stays dead even though it is unexpired.
    let replay = harness.auth.refresh(Some(&first.refresh_token)).await;
    assert!(matches!(
        replay.unwrap_err(),
        AuthError::TokenRotatedOrRevoked
    ));

    // The new token is the live one.
    assert!(harness.auth.refresh(Some(&second.refresh_token)).await.is_ok());
}

#[tokio::test]
async fn each_login_supersedes_prior_refresh_tokens() {
    let harness = setup();
    harness
        .auth
        .register(register_request("a@x.com"))
        .await
        .unwrap();

    let first = harness
        .auth
        .login(login_request("a@x.com", "secret1"))
        .await
        .unwrap();
    let second = harness
        .auth
        .login(login_request("a@x.com", "secret1"))
        .await
        .unwrap();
    assert_ne!(first.refresh_token, second.refresh_token);

    let stale = harness.auth.refresh(Some(&first.refresh_token)).await;
    assert!(matches!(
        stale.unwrap_err(),
        AuthError::TokenRotatedOrRevoked
    ));
    assert!(harness.auth.refresh(Some(&second.refresh_token)).await.is_ok());
    assert_eq!(harness.refresh_tokens.record_count(), 1);
}

#[tokio::test]
async fn refresh_without_token_is_unauthenticated() {
    let harness = setup();

    let result = harness.auth.refresh(None).await;
    assert!(matches!(result.unwrap_err(), AuthError::Unauthenticated));
}

#[tokio::test]
async fn refresh_with_expired_token_requires_relogin() {
    let harness = setup();
    let tokens = harness
        .auth
        .register(register_request("a@x.com"))
        .await
        .unwrap();

    // Same secrets, already-elapsed lifetime: cryptographically ours, but
    // past its expiration.
    let expired_codec = TokenCodec::new(TokenConfig {
        access_secret: ACCESS_SECRET.to_string(),
        refresh_secret: REFRESH_SECRET.to_string(),
        access_ttl: Duration::seconds(-300),
        refresh_ttl: Duration::seconds(-300),
    });
    let expired = expired_codec.issue(1, TokenKind::Refresh).unwrap();

    let result = harness.auth.refresh(Some(&expired)).await;
    assert!(matches!(result.unwrap_err(), AuthError::InvalidToken));

    // The stored, unexpired token still works.
    assert!(harness.auth.refresh(Some(&tokens.refresh_token)).await.is_ok());
}

#[tokio::test]
async fn refresh_rejects_access_tokens() {
    let harness = setup();
    let tokens = harness
        .auth
        .register(register_request("a@x.com"))
        .await
        .unwrap();

    let result = harness.auth.refresh(Some(&tokens.access_token)).await;
    assert!(matches!(result.unwrap_err(), AuthError::InvalidToken));
}

#[tokio::test]
async fn registration_survives_refresh_record_write_failure() {
    let harness = setup();
    harness.refresh_tokens.set_fail_upserts(true);

    let tokens = harness
        .auth
        .register(register_request("a@x.com"))
        .await
        .expect("registration should succeed despite the failed record write");
    assert!(!tokens.access_token.is_empty());
    assert_eq!(harness.refresh_tokens.record_count(), 0);

    // Without a stored record the issued refresh token cannot be redeemed.
    harness.refresh_tokens.set_fail_upserts(false);
    let result = harness.auth.refresh(Some(&tokens.refresh_token)).await;
    assert!(matches!(
        result.unwrap_err(),
        AuthError::TokenRotatedOrRevoked
    ));
}

#[tokio::test]
async fn refresh_fails_outright_when_rotation_write_fails() {
    let harness = setup();
    let tokens = harness
        .auth
        .register(register_request("a@x.com"))
        .await
        .unwrap();

    harness.refresh_tokens.set_fail_upserts(true);
    let result = harness.auth.refresh(Some(&tokens.refresh_token)).await;
    assert!(
        matches!(result.unwrap_err(), AuthError::Storage(_)),
        "a failed rotation write must fail the whole refresh"
    );

    // The previous token is still the stored one and remains redeemable.
    harness.refresh_tokens.set_fail_upserts(false);
    assert!(harness.auth.refresh(Some(&tokens.refresh_token)).await.is_ok());
}

#[tokio::test]
async fn authenticate_extracts_user_id_from_access_token() {
    let harness = setup();
    let tokens = harness
        .auth
        .register(register_request("a@x.com"))
        .await
        .unwrap();

    let user_id = harness
        .auth
        .authenticate(Some(&tokens.access_token))
        .expect("valid access token should authenticate");
    assert_eq!(user_id, 1);

    assert!(matches!(
        harness.auth.authenticate(None).unwrap_err(),
        AuthError::Unauthenticated
    ));
    assert!(matches!(
        harness
            .auth
            .authenticate(Some(&tokens.refresh_token))
            .unwrap_err(),
        AuthError::InvalidToken
    ));
    assert!(matches!(
        harness.auth.authenticate(Some("garbage")).unwrap_err(),
        AuthError::InvalidToken
    ));
}

#[tokio::test]
async fn current_user_returns_profile_without_hash() {
    let harness = setup();
    let tokens = harness
        .auth
        .register(register_request("a@x.com"))
        .await
        .unwrap();

    let user_id = harness.auth.authenticate(Some(&tokens.access_token)).unwrap();
    let profile = harness
        .auth
        .current_user(user_id)
        .await
        .expect("profile lookup should succeed");

    assert_eq!(profile.id, user_id);
    assert_eq!(profile.email, "a@x.com");

    let missing = harness.auth.current_user(999).await;
    assert!(matches!(missing.unwrap_err(), AuthError::InvalidToken));
}
