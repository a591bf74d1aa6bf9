//! Secret hashing using bcrypt
//!
//! Used for both account passwords and security-question answers.
//!
//! # Performance Considerations
//!
//! bcrypt is intentionally CPU-intensive. Request handlers use the `_async`
//! variants, which run on the blocking thread pool.

use anyhow::Result;

/// bcrypt work factor
pub const HASH_COST: u32 = 10;

/// Credential hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a secret with a fresh random salt (blocking operation)
    pub fn hash(secret: &str) -> Result<String> {
        bcrypt::hash(secret, HASH_COST).map_err(|e| anyhow::anyhow!("Failed to hash secret: {}", e))
    }

    /// Hash a secret on the blocking thread pool
    pub async fn hash_async(secret: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&secret))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a secret against a stored hash (blocking operation)
    ///
    /// A malformed stored hash is an error, not a mismatch.
    pub fn verify(secret: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(secret, hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))
    }

    /// Verify a secret on the blocking thread pool
    pub async fn verify_async(secret: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&secret, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Security answers are compared without surrounding whitespace
    pub fn normalize_answer(answer: &str) -> String {
        answer.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "secure_password_123";
        let hash = PasswordService::hash(password).unwrap();

        assert!(PasswordService::verify(password, &hash).unwrap());
        assert!(!PasswordService::verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_hash_uses_cost_ten() {
        let hash = PasswordService::hash("password123").unwrap();
        assert!(hash.starts_with("$2b$10$"), "unexpected hash prefix: {}", hash);
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let password = "test_password";
        let hash1 = PasswordService::hash(password).unwrap();
        let hash2 = PasswordService::hash(password).unwrap();

        assert_ne!(hash1, hash2);
        assert!(PasswordService::verify(password, &hash1).unwrap());
        assert!(PasswordService::verify(password, &hash2).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(PasswordService::verify("password123", "not-a-bcrypt-hash").is_err());
    }

    #[test]
    fn test_answer_normalization() {
        assert_eq!(PasswordService::normalize_answer("  Fluffy \n"), "Fluffy");
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let password = "async_test_password".to_string();
        let hash = PasswordService::hash_async(password.clone()).await.unwrap();

        assert!(PasswordService::verify_async(password.clone(), hash.clone()).await.unwrap());
        assert!(!PasswordService::verify_async("wrong".to_string(), hash).await.unwrap());
    }
}
