//! Integration tests for Ghanovia onboarding.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ghanovia-integration-tests
//! ```
//!
//! Each test starts the full onboarding router on an ephemeral port and
//! drives it with a cookie-keeping HTTP client, exactly as a browser would.
//! The identity provider is [`InMemoryIdentity`], so no Supabase project is
//! needed.
//!
//! # Test Categories
//!
//! - `auth_flow` - Sign up, verify, sign in and sign out through the pages
//! - `become_pro` - Wizard transitions over form posts
//! - `api` - JSON action API
//! - `platform` - Health checks and response headers

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use ghanovia_core::{OtpToken, Password, UkPhone, UserId};
use ghanovia_onboarding::config::{OnboardingConfig, SupabaseConfig};
use ghanovia_onboarding::services::identity::{
    AuthSession, AuthUser, IdentityProvider, ProfileRecord, ProfileStore, ProviderError,
    SignUpRequest, SignUpResponse, UserMetadata,
};
use ghanovia_onboarding::state::AppState;
use secrecy::SecretString;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;
use uuid::Uuid;

/// The only code [`InMemoryIdentity`] accepts.
pub const OTP_CODE: &str = "123456";

/// A phone number that passes validation.
pub const TEST_PHONE: &str = "+447911123456";

/// A password that passes validation.
pub const TEST_PASSWORD: &str = "hunter22";

// =============================================================================
// In-memory identity provider
// =============================================================================

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    password: String,
    confirmed: bool,
    metadata: UserMetadata,
}

#[derive(Debug, Default)]
struct Directory {
    accounts: HashMap<String, Account>,
    /// access token -> phone
    sessions: HashMap<String, String>,
    /// refresh token -> phone
    refresh_tokens: HashMap<String, String>,
    profiles: Vec<ProfileRecord>,
}

/// Stateful stand-in for Supabase auth and the profiles table.
///
/// Accounts start unconfirmed and are confirmed by [`OTP_CODE`]. Rejection
/// statuses and messages follow what the real service returns.
#[derive(Debug)]
pub struct InMemoryIdentity {
    directory: Mutex<Directory>,
    healthy: AtomicBool,
}

impl Default for InMemoryIdentity {
    fn default() -> Self {
        Self {
            directory: Mutex::new(Directory::default()),
            healthy: AtomicBool::new(true),
        }
    }
}

fn rejected(status: u16, message: &str) -> ProviderError {
    ProviderError::Rejected {
        status,
        message: message.to_string(),
    }
}

impl InMemoryIdentity {
    fn directory(&self) -> MutexGuard<'_, Directory> {
        self.directory.lock().expect("directory lock poisoned")
    }

    /// Make readiness checks fail (or pass again).
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Profile rows written so far.
    pub fn profiles(&self) -> Vec<ProfileRecord> {
        self.directory().profiles.clone()
    }

    /// Number of live access tokens.
    pub fn live_sessions(&self) -> usize {
        self.directory().sessions.len()
    }

    fn issue_session(directory: &mut Directory, phone: &str, account: &Account) -> AuthSession {
        let access_token = format!("access-{}", Uuid::new_v4());
        let refresh_token = format!("refresh-{}", Uuid::new_v4());
        directory
            .sessions
            .insert(access_token.clone(), phone.to_string());
        directory
            .refresh_tokens
            .insert(refresh_token.clone(), phone.to_string());

        AuthSession {
            access_token,
            refresh_token,
            expires_at: Utc::now().timestamp() + 3600,
            user: Some(Self::user(phone, account)),
        }
    }

    fn user(phone: &str, account: &Account) -> AuthUser {
        AuthUser {
            id: account.id,
            phone: Some(phone.trim_start_matches('+').to_string()),
            metadata: account.metadata.clone(),
        }
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    async fn sign_up(&self, request: SignUpRequest<'_>) -> Result<SignUpResponse, ProviderError> {
        let mut directory = self.directory();
        let phone = request.phone.as_str().to_string();

        if directory
            .accounts
            .get(&phone)
            .is_some_and(|account| account.confirmed)
        {
            return Err(rejected(422, "User already registered"));
        }

        directory.accounts.insert(
            phone,
            Account {
                id: UserId::new(Uuid::new_v4()),
                password: request.password.expose().to_string(),
                confirmed: false,
                metadata: UserMetadata {
                    username: request.display_name.map(|name| name.as_str().to_string()),
                    role: Some(request.role.as_str().to_string()),
                },
            },
        );
        Ok(SignUpResponse { session: None })
    }

    async fn verify_otp(
        &self,
        phone: &UkPhone,
        token: &OtpToken,
    ) -> Result<AuthSession, ProviderError> {
        let mut directory = self.directory();
        let phone = phone.as_str();

        let account = match directory.accounts.get_mut(phone) {
            Some(account) if token.as_str() == OTP_CODE => {
                account.confirmed = true;
                account.clone()
            }
            _ => return Err(rejected(403, "Token has expired or is invalid")),
        };

        Ok(Self::issue_session(&mut directory, phone, &account))
    }

    async fn sign_in_with_password(
        &self,
        phone: &UkPhone,
        password: &Password,
    ) -> Result<AuthSession, ProviderError> {
        let mut directory = self.directory();
        let phone = phone.as_str();

        let account = directory
            .accounts
            .get(phone)
            .filter(|account| account.confirmed && account.password == password.expose())
            .cloned()
            .ok_or_else(|| rejected(400, "Invalid login credentials"))?;

        Ok(Self::issue_session(&mut directory, phone, &account))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, ProviderError> {
        let mut directory = self.directory();
        let phone = directory
            .refresh_tokens
            .remove(refresh_token)
            .ok_or_else(|| rejected(400, "Invalid Refresh Token: Refresh Token Not Found"))?;
        let account = directory
            .accounts
            .get(&phone)
            .cloned()
            .ok_or_else(|| rejected(404, "User not found"))?;

        Ok(Self::issue_session(&mut directory, &phone, &account))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        self.directory()
            .sessions
            .remove(access_token)
            .map(|_| ())
            .ok_or_else(|| rejected(401, "invalid JWT"))
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, ProviderError> {
        let directory = self.directory();
        directory
            .sessions
            .get(access_token)
            .and_then(|phone| {
                directory
                    .accounts
                    .get(phone)
                    .map(|account| Self::user(phone, account))
            })
            .ok_or_else(|| rejected(401, "invalid JWT"))
    }

    async fn health(&self) -> Result<(), ProviderError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ProviderError::Unavailable("auth service down".to_string()))
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryIdentity {
    async fn upsert_profile(
        &self,
        access_token: &str,
        profile: &ProfileRecord,
    ) -> Result<(), ProviderError> {
        let mut directory = self.directory();
        if !directory.sessions.contains_key(access_token) {
            return Err(rejected(401, "invalid JWT"));
        }

        directory
            .profiles
            .retain(|existing| existing.user_id != profile.user_id);
        directory.profiles.push(profile.clone());
        Ok(())
    }
}

// =============================================================================
// Test context
// =============================================================================

/// Configuration for a server that only ever talks to [`InMemoryIdentity`].
#[must_use]
pub fn test_config() -> OnboardingConfig {
    OnboardingConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        supabase: SupabaseConfig {
            url: Url::parse("http://127.0.0.1:9").expect("static URL"),
            anon_key: SecretString::from("integration-test-anon-key"),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A running onboarding server plus a browser-like client.
pub struct TestContext {
    pub client: reqwest::Client,
    pub identity: Arc<InMemoryIdentity>,
    addr: SocketAddr,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Start a server backed by a fresh [`InMemoryIdentity`].
    pub async fn new() -> Self {
        let identity = Arc::new(InMemoryIdentity::default());
        let state = AppState::with_backends(test_config(), identity.clone(), identity.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let app = ghanovia_onboarding::app(state);
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        // Redirects are asserted, not followed
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            identity,
            addr,
            server,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// Sign up with [`TEST_PHONE`] and verify it, leaving the client signed in.
    pub async fn sign_up_and_verify(&self, username: &str, role: &str) {
        let response = self
            .post_form(
                "/auth/signup",
                &[
                    ("phone", TEST_PHONE),
                    ("password", TEST_PASSWORD),
                    ("username", username),
                    ("role", role),
                ],
            )
            .await;
        assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);

        let response = self
            .post_form("/auth/verify", &[("phone", TEST_PHONE), ("token", OTP_CODE)])
            .await;
        assert_eq!(location(&response), Some("/become-pro"));
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
}
