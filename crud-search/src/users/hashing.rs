//! Password hashing using Argon2id
//!
//! Use cases depend on the [`HashProvider`] trait; [`Argon2HashProvider`] is
//! the production implementation.
//!
//! # Example
//!
//! ```rust
//! use crud_search::users::{Argon2HashProvider, HashProvider};
//!
//! let hasher = Argon2HashProvider::with_params(1024, 1, 1).unwrap();
//! let hash = hasher.generate_hash("my_secure_password").unwrap();
//!
//! assert!(hasher.compare_hash("my_secure_password", &hash).unwrap());
//! assert!(!hasher.compare_hash("wrong_password", &hash).unwrap());
//! ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::{Error, Result};

/// One-way password hashing
pub trait HashProvider: Send + Sync {
    /// Hash `payload` with a fresh random salt
    fn generate_hash(&self, payload: &str) -> Result<String>;

    /// Whether `payload` matches a hash produced by [`generate_hash`](Self::generate_hash)
    fn compare_hash(&self, payload: &str, hash: &str) -> Result<bool>;
}

/// Argon2id hasher producing PHC-format strings
#[derive(Debug, Clone)]
pub struct Argon2HashProvider {
    params: Params,
}

impl Default for Argon2HashProvider {
    /// OWASP-recommended defaults (19 MiB, 2 iterations, 1 lane)
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2HashProvider {
    /// Create a hasher with explicit cost parameters
    pub fn with_params(memory_cost_kib: u32, time_cost: u32, parallelism: u32) -> Result<Self> {
        let params = Params::new(memory_cost_kib, time_cost, parallelism, None)
            .map_err(|e| Error::Auth(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl HashProvider for Argon2HashProvider {
    fn generate_hash(&self, payload: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(payload.as_bytes(), &salt)
            .map_err(|e| Error::Auth(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    fn compare_hash(&self, payload: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| Error::Auth(format!("Invalid password hash format: {}", e)))?;

        // Cost parameters are read from the hash itself
        match Argon2::default().verify_password(payload.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::Auth(format!("Password verification failed: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2HashProvider {
        Argon2HashProvider::with_params(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_generate_and_compare() {
        let hasher = hasher();
        let hash = hasher.generate_hash("test_password").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.compare_hash("test_password", &hash).unwrap());
        assert!(!hasher.compare_hash("fake", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = hasher();
        let a = hasher.generate_hash("same").unwrap();
        let b = hasher.generate_hash("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_compare_rejects_malformed_hash() {
        let err = hasher().compare_hash("password", "not-a-hash").unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[test]
    fn test_invalid_params() {
        assert!(Argon2HashProvider::with_params(1, 1, 1).is_err());
    }
}
