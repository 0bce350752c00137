//! Password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::errors::{AuthError, AuthResult};

/// One-way salted hashing contract consumed by the auth manager.
///
/// `verify` must not distinguish between an unparseable stored hash and a
/// wrong password; both are plain mismatches to the caller.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password
    fn hash(&self, password: &str) -> AuthResult<String>;

    /// Verify plaintext against a stored hash in constant time
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id implementation with a server-side pepper.
pub struct Argon2Hasher {
    pepper: String,
}

impl Argon2Hasher {
    pub fn new(pepper: String) -> Self {
        Self { pepper }
    }

    fn peppered(&self, password: &str) -> String {
        format!("{}{}", password, self.pepper)
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> AuthResult<String> {
        let peppered = self.peppered(password);
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        Ok(argon2
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::Hashing)?
            .to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let peppered = self.peppered(password);
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(peppered.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_with_same_pepper() {
        let hasher = Argon2Hasher::new("test_pepper".to_string());

        let hash = hasher.hash("secret1").expect("hashing should succeed");
        assert!(hasher.verify("secret1", &hash));
        assert!(!hasher.verify("secret2", &hash));
    }

    #[test]
    fn different_pepper_fails_verification() {
        let hasher = Argon2Hasher::new("pepper_a".to_string());
        let other = Argon2Hasher::new("pepper_b".to_string());

        let hash = hasher.hash("secret1").unwrap();
        assert!(!other.verify("secret1", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = Argon2Hasher::new("test_pepper".to_string());

        let first = hasher.hash("secret1").unwrap();
        let second = hasher.hash("secret1").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn unparseable_hash_is_a_mismatch() {
        let hasher = Argon2Hasher::new("test_pepper".to_string());
        assert!(!hasher.verify("secret1", "not-a-phc-string"));
    }
}
