//! Domain ports defining the edges of the service.
//!
//! Ports describe how the flows expect to interact with driven adapters.
//! The user store is the only collaborator here; it exposes strongly typed
//! errors so adapters map their failures into predictable variants instead
//! of returning `anyhow::Result`.

use async_trait::async_trait;
use thiserror::Error;

use super::user::{EmailAddress, UserRecord};

/// Failures raised by [`UserRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserStoreError {
    /// Insert would violate email uniqueness.
    #[error("email is already registered")]
    DuplicateEmail,
    /// Store connectivity, query, or consistency failure.
    #[error("user store unavailable: {message}")]
    Unavailable { message: String },
}

impl UserStoreError {
    /// Helper for infrastructure failures.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Persistence port for user records.
///
/// ## Contract
/// - `find_by_email` matches on the normalized address.
/// - `insert` is atomic with the uniqueness check: of two concurrent inserts
///   for the same email, exactly one succeeds and the other observes
///   [`UserStoreError::DuplicateEmail`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a record by its normalized email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserRecord>, UserStoreError>;

    /// Persist a new record, enforcing email uniqueness.
    async fn insert(&self, record: UserRecord) -> Result<UserRecord, UserStoreError>;
}
