//! Credential hashing.
//!
//! Wraps bcrypt so the rest of the domain only sees [`PasswordHash`] values.
//! The encoded hash is self-describing (algorithm, cost, salt, and digest in
//! one string), so verification needs no side-channel state. Hashing is
//! CPU-bound; callers on an async runtime must run it via
//! `tokio::task::spawn_blocking` (the auth service does).

use thiserror::Error;

use super::user::PasswordHash;

/// Upper bound on plaintext input, in bytes.
pub const MAX_PASSWORD_BYTES: usize = 1024;

/// Work factor used for stored credentials. At this cost a hash takes tens
/// of milliseconds, which resists offline brute force while staying
/// acceptable for interactive login.
pub const HASH_COST: u32 = 12;

/// Failures raised by [`PasswordHasher`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    /// Input exceeded [`MAX_PASSWORD_BYTES`].
    #[error("password must be at most {max} bytes")]
    InputTooLarge { max: usize },
    /// The underlying hash computation failed.
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
}

impl PasswordHashError {
    fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing {
            message: message.into(),
        }
    }
}

/// One-way password transform and matching verifier.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: HASH_COST }
    }
}

impl PasswordHasher {
    /// Hasher with a non-default work factor. Intended for tests, where the
    /// production cost would dominate the run time.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password into a storable, self-describing hash.
    ///
    /// Never fails for valid UTF-8 input within [`MAX_PASSWORD_BYTES`].
    pub fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordHashError::InputTooLarge {
                max: MAX_PASSWORD_BYTES,
            });
        }
        bcrypt::hash(plaintext, self.cost)
            .map(PasswordHash::new)
            .map_err(|error| PasswordHashError::hashing(error.to_string()))
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// The digest comparison is constant-time.
    pub fn verify(
        &self,
        plaintext: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordHashError::InputTooLarge {
                max: MAX_PASSWORD_BYTES,
            });
        }
        bcrypt::verify(plaintext, hash.as_str())
            .map_err(|error| PasswordHashError::hashing(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    // The production cost would make each case take hundreds of
    // milliseconds; correctness is cost-independent.
    #[fixture]
    fn hasher() -> PasswordHasher {
        PasswordHasher::with_cost(4)
    }

    #[rstest]
    fn hash_verifies_against_original_password(hasher: PasswordHasher) {
        let hash = hasher.hash("correct horse battery staple").expect("hash");
        assert!(
            hasher
                .verify("correct horse battery staple", &hash)
                .expect("verify")
        );
    }

    #[rstest]
    fn hash_rejects_other_passwords(hasher: PasswordHasher) {
        let hash = hasher.hash("correct horse battery staple").expect("hash");
        assert!(!hasher.verify("wrong horse", &hash).expect("verify"));
    }

    #[rstest]
    fn distinct_hashes_for_same_password(hasher: PasswordHasher) {
        let first = hasher.hash("longenough1").expect("hash");
        let second = hasher.hash("longenough1").expect("hash");
        assert_ne!(first.as_str(), second.as_str(), "salts must differ");
    }

    #[rstest]
    fn oversized_input_is_rejected(hasher: PasswordHasher) {
        let oversized = "x".repeat(MAX_PASSWORD_BYTES + 1);
        let err = hasher.hash(&oversized).expect_err("oversized must fail");
        assert_eq!(
            err,
            PasswordHashError::InputTooLarge {
                max: MAX_PASSWORD_BYTES
            }
        );
    }

    #[rstest]
    fn input_at_the_bound_is_accepted(hasher: PasswordHasher) {
        let at_bound = "x".repeat(MAX_PASSWORD_BYTES);
        assert!(hasher.hash(&at_bound).is_ok());
    }

    #[rstest]
    fn default_hasher_encodes_production_cost() {
        let hash = PasswordHasher::default().hash("longenough1").expect("hash");
        assert!(
            hash.as_str().contains("$12$"),
            "encoded hash should carry the cost factor: {}",
            hash.as_str()
        );
    }
}
