//! Request and response bodies for the auth (GoTrue) and REST (PostgREST) APIs.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::services::identity::{AuthSession, AuthUser, UserMetadata};

/// `POST /auth/v1/signup`
#[derive(Debug, Serialize)]
pub struct SignUpBody<'a> {
    pub phone: &'a str,
    pub password: &'a str,
    pub data: UserMetadata,
    pub channel: &'static str,
}

/// `POST /auth/v1/verify`
#[derive(Debug, Serialize)]
pub struct VerifyBody<'a> {
    pub phone: &'a str,
    pub token: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// `POST /auth/v1/token?grant_type=password`
#[derive(Debug, Serialize)]
pub struct PasswordGrantBody<'a> {
    pub phone: &'a str,
    pub password: &'a str,
}

/// `POST /auth/v1/token?grant_type=refresh_token`
#[derive(Debug, Serialize)]
pub struct RefreshGrantBody<'a> {
    pub refresh_token: &'a str,
}

/// Session as returned by the token, verify and (auto-confirmed) signup
/// endpoints.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

/// Lifetime assumed when the provider omits both expiry fields.
const DEFAULT_EXPIRES_IN_SECONDS: i64 = 3600;

impl TokenResponse {
    /// Convert to a session, deriving the absolute expiry from `expires_in`
    /// when the provider does not send `expires_at`.
    #[must_use]
    pub fn into_session(self) -> AuthSession {
        let expires_at = self.expires_at.unwrap_or_else(|| {
            Utc::now().timestamp() + self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECONDS)
        });

        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

/// Error body. GoTrue and PostgREST disagree on the field name, so every
/// known one is tried in turn.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The most specific human-readable message in the body.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.msg
            .or(self.error_description)
            .or(self.message)
            .or_else(|| match self.error {
                Some(serde_json::Value::String(error)) => Some(error),
                _ => None,
            })
            .filter(|message| !message.trim().is_empty())
    }
}
