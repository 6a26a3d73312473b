//! Identity gateway: the one place that talks to the identity provider.

use chrono::{Duration, Utc};
use ghanovia_core::{DisplayName, OtpToken, Password, Role, UkPhone};

use super::{
    AuthSession, AuthUser, IdentityProvider, ProfileRecord, ProfileStore, ProviderError,
    ReconciliationError, SessionStorage, SignUpRequest, StorageOptions,
};
use crate::error::{clear_sentry_user, set_sentry_user};

/// Storage key for the serialized provider session.
pub const SESSION_KEY: &str = "sb-auth-session";

/// How long a stored session survives without being refreshed.
const SESSION_MAX_AGE_DAYS: i64 = 7;

/// Identity operations for a single visitor.
///
/// Borrows the shared provider and profile store and the visitor's own
/// session storage, so it is built per request and dropped afterwards.
#[derive(Clone, Copy)]
pub struct IdentityGateway<'a> {
    provider: &'a dyn IdentityProvider,
    profiles: &'a dyn ProfileStore,
    storage: &'a dyn SessionStorage,
}

impl<'a> IdentityGateway<'a> {
    #[must_use]
    pub const fn new(
        provider: &'a dyn IdentityProvider,
        profiles: &'a dyn ProfileStore,
        storage: &'a dyn SessionStorage,
    ) -> Self {
        Self {
            provider,
            profiles,
            storage,
        }
    }

    /// Start registration: the provider texts an OTP to `phone`.
    ///
    /// `role` and `display_name` travel as user metadata until the profile
    /// row is written after verification.
    ///
    /// # Errors
    ///
    /// Returns the provider's rejection (phone already registered, weak
    /// password, SMS delivery failure, ...).
    pub async fn register(
        &self,
        phone: &UkPhone,
        password: &Password,
        display_name: Option<&DisplayName>,
        role: Role,
    ) -> Result<(), ProviderError> {
        let response = self
            .provider
            .sign_up(SignUpRequest {
                phone,
                password,
                display_name,
                role,
            })
            .await?;

        // Auto-confirming providers hand back a session straight away
        if let Some(session) = response.session {
            self.store_session(&session).await;
        }

        Ok(())
    }

    /// Exchange an SMS code for a session and store it.
    ///
    /// # Errors
    ///
    /// Returns the provider's rejection for a wrong or expired code.
    pub async fn verify_challenge(
        &self,
        phone: &UkPhone,
        token: &OtpToken,
    ) -> Result<AuthSession, ProviderError> {
        let session = self.provider.verify_otp(phone, token).await?;
        self.store_session(&session).await;
        Ok(session)
    }

    /// Write the profile row for the user behind a freshly verified session.
    ///
    /// The user is looked up with the session's own access token, and role
    /// and name come from the metadata given at sign up.
    ///
    /// # Errors
    ///
    /// Returns [`ReconciliationError`] if the user cannot be fetched or the
    /// upsert fails. Verification has already succeeded at this point, so
    /// callers log and drop it.
    pub async fn reconcile_profile(
        &self,
        session: &AuthSession,
    ) -> Result<ProfileRecord, ReconciliationError> {
        let user = self
            .provider
            .get_user(&session.access_token)
            .await
            .map_err(ReconciliationError::UserLookup)?;

        let profile = ProfileRecord::from_user(&user);
        self.profiles
            .upsert_profile(&session.access_token, &profile)
            .await
            .map_err(ReconciliationError::Upsert)?;

        tracing::info!(user_id = %profile.user_id, role = %profile.role, "Profile reconciled");
        Ok(profile)
    }

    /// Sign in with phone and password and store the session.
    ///
    /// # Errors
    ///
    /// Returns the provider's rejection for unknown phones or wrong
    /// passwords.
    pub async fn authenticate(
        &self,
        phone: &UkPhone,
        password: &Password,
    ) -> Result<AuthSession, ProviderError> {
        let session = self.provider.sign_in_with_password(phone, password).await?;
        self.store_session(&session).await;
        Ok(session)
    }

    /// Revoke the stored session with the provider and forget it.
    ///
    /// Succeeds without calling the provider when nothing is stored. A
    /// token the provider no longer recognises counts as signed out.
    ///
    /// # Errors
    ///
    /// Returns any other provider failure; the stored session is kept so
    /// the visitor can retry.
    pub async fn terminate(&self) -> Result<(), ProviderError> {
        if let Some(session) = self.load_session().await {
            match self.provider.sign_out(&session.access_token).await {
                Ok(()) => {}
                Err(err) if err.is_session_gone() => {
                    tracing::debug!(error = %err, "Session already revoked by provider");
                }
                Err(err) => return Err(err),
            }
        }

        self.clear_session().await;
        clear_sentry_user();
        Ok(())
    }

    /// The signed-in user, refreshing an expired session first.
    ///
    /// Any failure reads as "no user".
    pub async fn current_user(&self) -> Option<AuthUser> {
        let mut session = self.load_session().await?;

        if session.is_expired(Utc::now().timestamp()) {
            match self.provider.refresh_session(&session.refresh_token).await {
                Ok(refreshed) => {
                    self.store_session(&refreshed).await;
                    session = refreshed;
                }
                Err(err) => {
                    tracing::debug!(error = %err, "Session refresh failed");
                    self.clear_session().await;
                    return None;
                }
            }
        }

        match self.provider.get_user(&session.access_token).await {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::debug!(error = %err, "Current user lookup failed");
                None
            }
        }
    }

    async fn load_session(&self) -> Option<AuthSession> {
        let raw = match self.storage.get(SESSION_KEY).await {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read session");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                tracing::warn!(error = %err, "Discarding unreadable session");
                self.clear_session().await;
                None
            }
        }
    }

    /// Persist `session`. Write failures are logged, never surfaced: the
    /// provider call already succeeded.
    async fn store_session(&self, session: &AuthSession) {
        if let Some(user) = &session.user {
            set_sentry_user(&user.id);
        }

        let raw = match serde_json::to_string(session) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to serialize session");
                return;
            }
        };

        let options = StorageOptions::with_max_age(Duration::days(SESSION_MAX_AGE_DAYS));
        if let Err(err) = self.storage.set(SESSION_KEY, raw, options).await {
            tracing::warn!(error = %err, "Failed to store session");
        }
    }

    async fn clear_session(&self) {
        if let Err(err) = self.storage.remove(SESSION_KEY).await {
            tracing::warn!(error = %err, "Failed to clear session");
        }
    }
}
