//! In-memory user store adapter.
//!
//! Backs the [`UserRepository`] port with a mutex-guarded map keyed by
//! normalized email. The check-then-insert runs under one lock acquisition,
//! so concurrent registrations for the same email cannot both succeed; a
//! database adapter would rely on a unique constraint for the same
//! guarantee.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UserStoreError};
use crate::domain::user::{EmailAddress, UserRecord};

/// Mutex-guarded map of user records keyed by normalized email.
#[derive(Default)]
pub struct InMemoryUserRepository {
    records: Mutex<HashMap<String, UserRecord>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserRecord>, UserStoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| UserStoreError::unavailable("store lock poisoned"))?;
        Ok(guard.get(email.as_str()).cloned())
    }

    async fn insert(&self, record: UserRecord) -> Result<UserRecord, UserStoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| UserStoreError::unavailable("store lock poisoned"))?;
        if guard.contains_key(record.email().as_str()) {
            return Err(UserStoreError::DuplicateEmail);
        }
        guard.insert(record.email().as_str().to_owned(), record.clone());
        Ok(record)
    }
}
