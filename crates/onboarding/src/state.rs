//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::OnboardingConfig;
use crate::services::identity::{IdentityGateway, IdentityProvider, ProfileStore, SessionStorage};
use crate::supabase::{SupabaseClient, SupabaseError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and read-only after start-up.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: OnboardingConfig,
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
}

impl AppState {
    /// Create application state backed by Supabase.
    ///
    /// # Errors
    ///
    /// Returns an error if the Supabase client cannot be built.
    pub fn new(config: OnboardingConfig) -> Result<Self, SupabaseError> {
        let client = Arc::new(SupabaseClient::new(&config.supabase)?);
        Ok(Self::with_backends(config, client.clone(), client))
    }

    /// Create application state with explicit identity backends.
    #[must_use]
    pub fn with_backends(
        config: OnboardingConfig,
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                identity,
                profiles,
            }),
        }
    }

    /// Get a reference to the onboarding configuration.
    #[must_use]
    pub fn config(&self) -> &OnboardingConfig {
        &self.inner.config
    }

    /// Get a reference to the identity provider.
    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    /// Identity gateway for one visitor's session storage.
    #[must_use]
    pub fn gateway<'a>(&'a self, storage: &'a dyn SessionStorage) -> IdentityGateway<'a> {
        IdentityGateway::new(
            self.inner.identity.as_ref(),
            self.inner.profiles.as_ref(),
            storage,
        )
    }
}
