//! HTTP client for the Supabase auth and REST APIs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ghanovia_core::{OtpToken, Password, UkPhone};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use url::Url;

use super::SupabaseError;
use super::types::{
    ErrorBody, PasswordGrantBody, RefreshGrantBody, SignUpBody, TokenResponse, VerifyBody,
};
use crate::config::SupabaseConfig;
use crate::services::identity::{
    AuthSession, AuthUser, IdentityProvider, ProfileRecord, ProfileStore, ProviderError,
    SignUpRequest, SignUpResponse, UserMetadata,
};

/// Request timeout for every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the project API key.
const API_KEY_HEADER: &str = "apikey";

/// Client for Supabase auth and the `profiles` table.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl SupabaseClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::from_str(config.anon_key.expose_secret())
            .map_err(|e| SupabaseError::Config(format!("Invalid API key format: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        // Relative joins below need the base path to end in a slash
        let mut base_url = config.url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(SupabaseClientInner { client, base_url }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SupabaseError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| SupabaseError::Config(format!("Invalid endpoint {path}: {e}")))
    }

    fn token_endpoint(&self, grant_type: &str) -> Result<Url, SupabaseError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        Ok(url)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Auth API
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a phone + password user and send an SMS code.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider rejects it.
    pub async fn sign_up(&self, request: SignUpRequest<'_>) -> Result<SignUpResponse, SupabaseError> {
        let body = SignUpBody {
            phone: request.phone.as_str(),
            password: request.password.expose(),
            data: UserMetadata {
                username: request.display_name.map(|name| name.as_str().to_string()),
                role: Some(request.role.as_str().to_string()),
            },
            channel: "sms",
        };

        let response = self
            .send(self.inner.client.post(self.endpoint("auth/v1/signup")?).json(&body))
            .await?;
        let value: serde_json::Value = parse_json(response).await?;

        // Unconfirmed sign ups return the bare user; auto-confirmed ones a session
        let session = if value.get("access_token").is_some() {
            let token: TokenResponse =
                serde_json::from_value(value).map_err(|e| SupabaseError::Parse(e.to_string()))?;
            Some(token.into_session())
        } else {
            None
        };

        Ok(SignUpResponse { session })
    }

    /// Verify an SMS code.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the code is wrong or expired.
    pub async fn verify_otp(
        &self,
        phone: &UkPhone,
        token: &OtpToken,
    ) -> Result<AuthSession, SupabaseError> {
        let body = VerifyBody {
            phone: phone.as_str(),
            token: token.as_str(),
            kind: "sms",
        };

        let response = self
            .send(self.inner.client.post(self.endpoint("auth/v1/verify")?).json(&body))
            .await?;
        let token: TokenResponse = parse_json(response).await?;
        Ok(token.into_session())
    }

    /// Password grant.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the credentials are rejected.
    pub async fn sign_in_with_password(
        &self,
        phone: &UkPhone,
        password: &Password,
    ) -> Result<AuthSession, SupabaseError> {
        let body = PasswordGrantBody {
            phone: phone.as_str(),
            password: password.expose(),
        };

        let response = self
            .send(self.inner.client.post(self.token_endpoint("password")?).json(&body))
            .await?;
        let token: TokenResponse = parse_json(response).await?;
        Ok(token.into_session())
    }

    /// Refresh-token grant.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the refresh token is invalid.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, SupabaseError> {
        let body = RefreshGrantBody { refresh_token };

        let response = self
            .send(
                self.inner
                    .client
                    .post(self.token_endpoint("refresh_token")?)
                    .json(&body),
            )
            .await?;
        let token: TokenResponse = parse_json(response).await?;
        Ok(token.into_session())
    }

    /// Revoke the session behind `access_token`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider rejects it.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        self.send(
            self.inner
                .client
                .post(self.endpoint("auth/v1/logout")?)
                .bearer_auth(access_token),
        )
        .await?;
        Ok(())
    }

    /// Fetch the user behind `access_token`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the token is invalid.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, SupabaseError> {
        let response = self
            .send(
                self.inner
                    .client
                    .get(self.endpoint("auth/v1/user")?)
                    .bearer_auth(access_token),
            )
            .await?;
        parse_json(response).await
    }

    /// Auth service health endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the service is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), SupabaseError> {
        self.send(self.inner.client.get(self.endpoint("auth/v1/health")?))
            .await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // REST API
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or update the profile row, resolving conflicts on `user_id`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the row is rejected.
    pub async fn upsert_profile(
        &self,
        access_token: &str,
        profile: &ProfileRecord,
    ) -> Result<(), SupabaseError> {
        let mut url = self.endpoint("rest/v1/profiles")?;
        url.query_pairs_mut().append_pair("on_conflict", "user_id");

        self.send(
            self.inner
                .client
                .post(url)
                .bearer_auth(access_token)
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .json(profile),
        )
        .await?;
        Ok(())
    }

    /// Send a request, turning non-2xx responses into [`SupabaseError::Api`]
    /// carrying the provider's message.
    async fn send(&self, request: RequestBuilder) -> Result<Response, SupabaseError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unexpected response from auth service")
                    .to_string()
            });

        tracing::debug!(status = status.as_u16(), %message, "Supabase request rejected");
        Err(SupabaseError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, SupabaseError> {
    response
        .json()
        .await
        .map_err(|e| SupabaseError::Parse(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Identity seams
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl IdentityProvider for SupabaseClient {
    async fn sign_up(&self, request: SignUpRequest<'_>) -> Result<SignUpResponse, ProviderError> {
        Ok(Self::sign_up(self, request).await?)
    }

    async fn verify_otp(
        &self,
        phone: &UkPhone,
        token: &OtpToken,
    ) -> Result<AuthSession, ProviderError> {
        Ok(Self::verify_otp(self, phone, token).await?)
    }

    async fn sign_in_with_password(
        &self,
        phone: &UkPhone,
        password: &Password,
    ) -> Result<AuthSession, ProviderError> {
        Ok(Self::sign_in_with_password(self, phone, password).await?)
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, ProviderError> {
        Ok(Self::refresh_session(self, refresh_token).await?)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        Ok(Self::sign_out(self, access_token).await?)
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, ProviderError> {
        Ok(Self::get_user(self, access_token).await?)
    }

    async fn health(&self) -> Result<(), ProviderError> {
        Ok(Self::health(self).await?)
    }
}

#[async_trait]
impl ProfileStore for SupabaseClient {
    async fn upsert_profile(
        &self,
        access_token: &str,
        profile: &ProfileRecord,
    ) -> Result<(), ProviderError> {
        Ok(Self::upsert_profile(self, access_token, profile).await?)
    }
}
