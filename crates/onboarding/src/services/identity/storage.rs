//! Session storage capability.
//!
//! The gateway never touches cookies or the session layer directly; it is
//! handed something that can get, set and remove string values by key.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Storage backend failure.
#[derive(Debug, Error)]
#[error("session storage error: {0}")]
pub struct StorageError(pub String);

/// Options applied when writing a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageOptions {
    /// Drop the value after this long. `None` keeps it for the life of the
    /// underlying session.
    pub max_age: Option<Duration>,
}

impl StorageOptions {
    #[must_use]
    pub const fn with_max_age(max_age: Duration) -> Self {
        Self {
            max_age: Some(max_age),
        }
    }

    /// Absolute expiry for a value written at `now`.
    #[must_use]
    pub fn expires_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.max_age.map(|max_age| now + max_age)
    }
}

/// Key/value store scoped to one visitor.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Read a value. Expired values read as `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: String, options: StorageOptions)
    -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Value plus optional absolute expiry.
type Entries = HashMap<String, (String, Option<DateTime<Utc>>)>;

/// In-process storage, for tests and tooling.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    values: Mutex<Entries>,
}

impl MemorySessionStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries>, StorageError> {
        self.values
            .lock()
            .map_err(|_| StorageError("memory storage lock poisoned".to_string()))
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut values = self.lock()?;
        let expired = values
            .get(key)
            .is_some_and(|(_, expires_at)| expires_at.is_some_and(|at| at <= Utc::now()));
        if expired {
            values.remove(key);
            return Ok(None);
        }
        Ok(values.get(key).map(|(value, _)| value.clone()))
    }

    async fn set(
        &self,
        key: &str,
        value: String,
        options: StorageOptions,
    ) -> Result<(), StorageError> {
        let expires_at = options.expires_at(Utc::now());
        self.lock()?.insert(key.to_string(), (value, expires_at));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
