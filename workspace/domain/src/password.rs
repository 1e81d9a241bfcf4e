use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::Deserialize;

use crate::error::{DomainError, Result};

/// Argon2id cost parameters.
///
/// Defaults are the `argon2` crate's recommended values. Stored hashes embed
/// their own parameters, so changing these only affects newly hashed passwords.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Hashes and verifies user passwords with Argon2id.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    /// Builds a hasher, rejecting parameter combinations Argon2 does not accept.
    pub fn new(config: &HashingConfig) -> Result<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| DomainError::PasswordHash(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password into a PHC string with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC string.
    ///
    /// A mismatch is `Ok(false)`; only an unparseable stored hash is an error.
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(stored_hash)?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::cheap_hashing;

    #[test]
    fn test_password_hash_and_verify_correct() {
        let hasher = CredentialHasher::new(&cheap_hashing()).unwrap();
        let hash = hasher.hash("my-secure-password").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("my-secure-password", &hash).unwrap());
    }

    #[test]
    fn test_password_verify_wrong() {
        let hasher = CredentialHasher::new(&cheap_hashing()).unwrap();
        let hash = hasher.hash("correct-password").unwrap();
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_password_different_salts() {
        let hasher = CredentialHasher::new(&cheap_hashing()).unwrap();
        let hash1 = hasher.hash("same-password").unwrap();
        let hash2 = hasher.hash("same-password").unwrap();
        assert_ne!(hash1, hash2);
        assert!(hasher.verify("same-password", &hash1).unwrap());
        assert!(hasher.verify("same-password", &hash2).unwrap());
    }

    #[test]
    fn test_hash_from_other_params_still_verifies() {
        let cheap = CredentialHasher::new(&cheap_hashing()).unwrap();
        let other = CredentialHasher::new(&HashingConfig {
            memory_kib: 16,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        let hash = other.hash("pw-123456").unwrap();
        assert!(cheap.verify("pw-123456", &hash).unwrap());
    }

    #[test]
    fn test_corrupt_stored_hash_is_an_error() {
        let hasher = CredentialHasher::new(&cheap_hashing()).unwrap();
        let result = hasher.verify("anything", "not-a-phc-string");
        assert!(matches!(result, Err(DomainError::PasswordHash(_))));
    }

    #[test]
    fn test_rejects_invalid_params() {
        let result = CredentialHasher::new(&HashingConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(result.is_err());
    }
}
