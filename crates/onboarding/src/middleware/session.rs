//! Session middleware configuration.
//!
//! Sessions live in an in-process `tower-sessions` store keyed by an
//! HTTP-only cookie. The identity gateway sees them through
//! [`TowerSessionStorage`], and handlers use the flash helpers to carry an
//! [`ActionOutcome`] across a redirect.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ghanovia_core::ActionOutcome;
use serde::{Deserialize, Serialize};
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::OnboardingConfig;
use crate::services::identity::{SessionStorage, StorageError, StorageOptions};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "ghanovia_session";

/// Session key for the one-shot outcome shown after a redirect.
pub const FLASH_KEY: &str = "flash";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &OnboardingConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

// =============================================================================
// Gateway storage
// =============================================================================

/// A stored value with its own expiry, independent of the cookie's.
#[derive(Debug, Serialize, Deserialize)]
struct StoredValue {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

/// [`SessionStorage`] over the visitor's `tower-sessions` session.
#[derive(Debug, Clone)]
pub struct TowerSessionStorage(Session);

impl TowerSessionStorage {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }
}

fn storage_error(err: tower_sessions::session::Error) -> StorageError {
    StorageError(err.to_string())
}

#[async_trait]
impl SessionStorage for TowerSessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let Some(stored) = self
            .0
            .get::<StoredValue>(key)
            .await
            .map_err(storage_error)?
        else {
            return Ok(None);
        };

        if stored.expires_at.is_some_and(|at| at <= Utc::now()) {
            self.0.remove_value(key).await.map_err(storage_error)?;
            return Ok(None);
        }
        Ok(Some(stored.value))
    }

    async fn set(
        &self,
        key: &str,
        value: String,
        options: StorageOptions,
    ) -> Result<(), StorageError> {
        let stored = StoredValue {
            value,
            expires_at: options.expires_at(Utc::now()),
        };
        self.0.insert(key, stored).await.map_err(storage_error)
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.0.remove_value(key).await.map_err(storage_error)?;
        Ok(())
    }
}

// =============================================================================
// Flash
// =============================================================================

/// Store an outcome to show on the next page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(
    session: &Session,
    outcome: &ActionOutcome,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(FLASH_KEY, outcome).await
}

/// Take the pending outcome, leaving none behind. `Idle` when nothing is set.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn take_flash(session: &Session) -> Result<ActionOutcome, tower_sessions::session::Error> {
    Ok(session
        .remove::<ActionOutcome>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_storage_roundtrip() {
        let storage = TowerSessionStorage::new(session());
        storage
            .set("k", "v".to_string(), StorageOptions::default())
            .await
            .unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v"));

        storage.remove("k").await.unwrap();
        assert!(storage.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_storage_expired_value_reads_as_none() {
        let storage = TowerSessionStorage::new(session());
        storage
            .set(
                "k",
                "v".to_string(),
                StorageOptions::with_max_age(Duration::seconds(-1)),
            )
            .await
            .unwrap();
        assert!(storage.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_flash_is_one_shot() {
        let session = session();
        set_flash(&session, &ActionOutcome::success("Signed out."))
            .await
            .unwrap();

        assert_eq!(
            take_flash(&session).await.unwrap(),
            ActionOutcome::success("Signed out.")
        );
        assert_eq!(take_flash(&session).await.unwrap(), ActionOutcome::Idle);
    }
}
