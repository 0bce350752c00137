//! Repository trait definitions for testability and dependency injection.
//!
//! This module defines the credential-store contract consumed by the auth
//! manager, together with the PostgreSQL implementations. In-memory
//! implementations for tests live in [`crate::db::memory`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use thiserror::Error;

use crate::auth::models::{RefreshTokenRecord, User, UserId};

/// Storage-layer failure
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store rejected or could not complete the operation
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for user record operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create_user(&self, name: &str, email: &str, password_hash: &str)
    -> StorageResult<User>;

    /// Find user by email (exact, case-sensitive match)
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: UserId) -> StorageResult<Option<User>>;
}

/// Trait for the single-per-user refresh token records
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Insert or replace the record keyed by user id
    async fn upsert(
        &self,
        user_id: UserId,
        token: &str,
        created_at: DateTime<Utc>,
    ) -> StorageResult<RefreshTokenRecord>;

    /// Find the current record for a user
    async fn find_by_user_id(&self, user_id: UserId) -> StorageResult<Option<RefreshTokenRecord>>;
}

/// Default PostgreSQL implementation of `UserRepository`
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> StorageResult<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row))
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_by_id(&self, user_id: UserId) -> StorageResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }
}

/// Default PostgreSQL implementation of `RefreshTokenRepository`
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn upsert(
        &self,
        user_id: UserId,
        token: &str,
        created_at: DateTime<Utc>,
    ) -> StorageResult<RefreshTokenRecord> {
        // Plain upsert keyed by user id; the previous token value is not
        // compared, so concurrent rotations are last-writer-wins.
        let row = sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET token = EXCLUDED.token, created_at = EXCLUDED.created_at
            RETURNING user_id, token, created_at
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(created_at.naive_utc())
        .fetch_one(&self.pool)
        .await?;

        Ok(RefreshTokenRecord {
            user_id: row.get("user_id"),
            token: row.get("token"),
            created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        })
    }

    async fn find_by_user_id(&self, user_id: UserId) -> StorageResult<Option<RefreshTokenRecord>> {
        let row = sqlx::query(
            "SELECT user_id, token, created_at FROM refresh_tokens WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| RefreshTokenRecord {
            user_id: r.get("user_id"),
            token: r.get("token"),
            created_at: r.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        }))
    }
}
