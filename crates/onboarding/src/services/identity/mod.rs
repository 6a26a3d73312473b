//! Identity gateway and the seams it depends on.
//!
//! ```text
//!   actions ──> IdentityGateway ──> dyn IdentityProvider  (sign up, OTP, password, refresh, user)
//!                      │        └─> dyn ProfileStore      (profile upsert)
//!                      └──────────> dyn SessionStorage    (per-visitor session blob)
//! ```
//!
//! Production wires the provider and profile store to [`crate::supabase::SupabaseClient`]
//! and storage to the visitor's `tower-sessions` session.

mod error;
mod gateway;
mod storage;
#[cfg(test)]
pub(crate) mod testing;
mod types;

pub use error::{ProviderError, ReconciliationError};
pub use gateway::{IdentityGateway, SESSION_KEY};
pub use storage::{MemorySessionStorage, SessionStorage, StorageError, StorageOptions};
pub use types::{
    AuthSession, AuthUser, ProfileRecord, SignUpRequest, SignUpResponse, UserMetadata,
};

use async_trait::async_trait;
use ghanovia_core::{OtpToken, Password, UkPhone};

/// Phone + password identity provider with SMS one-time codes.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an unconfirmed user and text them a code.
    async fn sign_up(&self, request: SignUpRequest<'_>) -> Result<SignUpResponse, ProviderError>;

    /// Confirm a phone with the texted code, issuing a session.
    async fn verify_otp(
        &self,
        phone: &UkPhone,
        token: &OtpToken,
    ) -> Result<AuthSession, ProviderError>;

    async fn sign_in_with_password(
        &self,
        phone: &UkPhone,
        password: &Password,
    ) -> Result<AuthSession, ProviderError>;

    /// Trade a refresh token for a new session.
    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, ProviderError>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError>;

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, ProviderError>;

    /// Reachability probe for readiness checks.
    async fn health(&self) -> Result<(), ProviderError>;
}

/// Application profile table.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert or update the row keyed by `profile.user_id`, acting as the
    /// user behind `access_token`.
    async fn upsert_profile(
        &self,
        access_token: &str,
        profile: &ProfileRecord,
    ) -> Result<(), ProviderError>;
}
