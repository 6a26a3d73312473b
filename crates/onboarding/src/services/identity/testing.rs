//! Test doubles for the identity seams.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use ghanovia_core::{OtpToken, Password, UkPhone, UserId};
use uuid::Uuid;

use super::{
    AuthSession, AuthUser, IdentityProvider, ProfileRecord, ProfileStore, ProviderError,
    SessionStorage, SignUpRequest, SignUpResponse, StorageError, StorageOptions, UserMetadata,
};

/// Session for `user_id` that expires `expires_in` seconds from now.
pub fn session_for(user_id: UserId, expires_in: i64) -> AuthSession {
    AuthSession {
        access_token: format!("access-{user_id}"),
        refresh_token: format!("refresh-{user_id}"),
        expires_at: Utc::now().timestamp() + expires_in,
        user: Some(AuthUser {
            id: user_id,
            phone: Some("447911123456".to_string()),
            metadata: UserMetadata::default(),
        }),
    }
}

/// Scriptable provider and profile store that records every call.
#[derive(Debug, Default)]
pub struct FakeProvider {
    auto_confirm: bool,
    fail_get_user: bool,
    metadata: UserMetadata,
    reject: Option<ProviderError>,
    calls: Mutex<Vec<String>>,
    profiles: Mutex<Vec<ProfileRecord>>,
}

impl FakeProvider {
    /// Provider that rejects every call with `message`.
    pub fn rejecting(message: &str) -> Self {
        Self {
            reject: Some(ProviderError::Rejected {
                status: 400,
                message: message.to_string(),
            }),
            ..Self::default()
        }
    }

    /// Sign up returns a session straight away, as with phone autoconfirm.
    pub fn with_auto_confirm(mut self) -> Self {
        self.auto_confirm = true;
        self
    }

    /// `get_user` fails as if the network dropped.
    pub fn failing_get_user(mut self) -> Self {
        self.fail_get_user = true;
        self
    }

    /// Metadata returned by `get_user`.
    pub fn with_metadata(mut self, metadata: UserMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        if let Some(ProviderError::Rejected { status: current, .. }) = &mut self.reject {
            *current = status;
        }
        self
    }

    pub fn user_id() -> UserId {
        UserId::new(Uuid::from_u128(0x5b0c_2f0e_8d7a_4a43_9a51_6d1c_7b8f_2e11))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn profiles(&self) -> Vec<ProfileRecord> {
        self.profiles.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push(call.into());
        self.reject.clone().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn sign_up(&self, request: SignUpRequest<'_>) -> Result<SignUpResponse, ProviderError> {
        self.record(format!(
            "sign_up:{}:{}:{}",
            request.phone,
            request.display_name.map_or("", |name| name.as_str()),
            request.role
        ))?;
        let session = self
            .auto_confirm
            .then(|| session_for(Self::user_id(), 3600));
        Ok(SignUpResponse { session })
    }

    async fn verify_otp(
        &self,
        phone: &UkPhone,
        token: &OtpToken,
    ) -> Result<AuthSession, ProviderError> {
        self.record(format!("verify:{phone}:{token}"))?;
        Ok(session_for(Self::user_id(), 3600))
    }

    async fn sign_in_with_password(
        &self,
        _phone: &UkPhone,
        _password: &Password,
    ) -> Result<AuthSession, ProviderError> {
        self.record("sign_in")?;
        Ok(session_for(Self::user_id(), 3600))
    }

    async fn refresh_session(&self, _refresh_token: &str) -> Result<AuthSession, ProviderError> {
        self.record("refresh")?;
        Ok(session_for(Self::user_id(), 3600))
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), ProviderError> {
        self.record("sign_out")
    }

    async fn get_user(&self, _access_token: &str) -> Result<AuthUser, ProviderError> {
        self.record("get_user")?;
        if self.fail_get_user {
            return Err(ProviderError::Unavailable("connection reset".to_string()));
        }
        Ok(AuthUser {
            id: Self::user_id(),
            phone: Some("447911123456".to_string()),
            metadata: self.metadata.clone(),
        })
    }

    async fn health(&self) -> Result<(), ProviderError> {
        self.record("health")
    }
}

#[async_trait]
impl ProfileStore for FakeProvider {
    async fn upsert_profile(
        &self,
        _access_token: &str,
        profile: &ProfileRecord,
    ) -> Result<(), ProviderError> {
        self.record("upsert_profile")?;
        self.profiles.lock().unwrap().push(profile.clone());
        Ok(())
    }
}

/// Storage whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingStorage;

#[async_trait]
impl SessionStorage for FailingStorage {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError("store offline".to_string()))
    }

    async fn set(
        &self,
        _key: &str,
        _value: String,
        _options: StorageOptions,
    ) -> Result<(), StorageError> {
        Err(StorageError("store offline".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError("store offline".to_string()))
    }
}
