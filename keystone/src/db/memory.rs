//! In-memory credential store.
//!
//! HashMap-backed implementations of the repository traits, used as test
//! doubles and for running the service without a database. The refresh
//! token store supports upsert-failure injection so the best-effort and
//! fatal persistence policies of the auth manager can both be exercised.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::repository::{
    RefreshTokenRepository, StorageError, StorageResult, UserRepository,
};
use crate::auth::models::{RefreshTokenRecord, User, UserId};

/// In-memory implementation of `UserRepository`
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
    next_id: Mutex<UserId>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            next_id: Mutex::new(1),
        }
    }

    /// Seed the store with an existing user
    pub fn with_user(self, user: User) -> Self {
        self.users.lock().unwrap().insert(user.id, user);
        self
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> StorageResult<User> {
        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;

        let user = User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };

        self.users.lock().unwrap().insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> StorageResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }
}

/// In-memory implementation of `RefreshTokenRepository`
pub struct InMemoryRefreshTokenRepository {
    records: Mutex<HashMap<UserId, RefreshTokenRecord>>,
    fail_upserts: AtomicBool,
}

impl Default for InMemoryRefreshTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail_upserts: AtomicBool::new(false),
        }
    }

    /// Make subsequent upserts fail with a storage error
    pub fn set_fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    /// Number of live records across all users
    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn upsert(
        &self,
        user_id: UserId,
        token: &str,
        created_at: DateTime<Utc>,
    ) -> StorageResult<RefreshTokenRecord> {
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "refresh token store offline".to_string(),
            ));
        }

        let record = RefreshTokenRecord {
            user_id,
            token: token.to_string(),
            created_at,
        };

        self.records.lock().unwrap().insert(user_id, record.clone());
        Ok(record)
    }

    async fn find_by_user_id(&self, user_id: UserId) -> StorageResult<Option<RefreshTokenRecord>> {
        Ok(self.records.lock().unwrap().get(&user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn user_ids_are_sequential() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create_user("A", "a@x.com", "hash").await.unwrap();
        let second = repo.create_user("B", "b@x.com", "hash").await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn find_by_email_is_exact() {
        let repo = InMemoryUserRepository::new();
        repo.create_user("A", "a@x.com", "hash").await.unwrap();

        assert!(repo.find_by_email("a@x.com").await.unwrap().is_some());
        assert!(repo.find_by_email("A@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_replaces_the_single_record() {
        let repo = InMemoryRefreshTokenRepository::new();

        repo.upsert(1, "first", Utc::now()).await.unwrap();
        repo.upsert(1, "second", Utc::now()).await.unwrap();

        assert_eq!(repo.record_count(), 1);
        let record = repo.find_by_user_id(1).await.unwrap().unwrap();
        assert_eq!(record.token, "second");
    }

    #[tokio::test]
    async fn failure_injection_errors_upserts() {
        let repo = InMemoryRefreshTokenRepository::new();
        repo.set_fail_upserts(true);

        let result = repo.upsert(1, "token", Utc::now()).await;
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
        assert_eq!(repo.record_count(), 0);

        repo.set_fail_upserts(false);
        assert!(repo.upsert(1, "token", Utc::now()).await.is_ok());
    }
}
