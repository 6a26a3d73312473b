//! Identity data exchanged with the provider.

use ghanovia_core::{DisplayName, Password, Role, UkPhone, UserId};
use serde::{Deserialize, Serialize};

/// Seconds before expiry at which a session is treated as expired.
const EXPIRY_MARGIN_SECONDS: i64 = 10;

/// Metadata attached to a user at sign up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserMetadata {
    /// Role recorded at sign up. Missing or unrecognised values fall back to
    /// [`Role::Professional`].
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
            .as_deref()
            .and_then(|role| Role::parse(role).ok())
            .unwrap_or_default()
    }
}

/// A user as known to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, rename = "user_metadata")]
    pub metadata: UserMetadata,
}

/// Provider-issued session credentials.
///
/// Implements `Debug` manually to redact the tokens.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) at which the access token expires.
    pub expires_at: i64,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

impl AuthSession {
    /// Whether the access token should be refreshed before use at `now`.
    #[must_use]
    pub const fn is_expired(&self, now: i64) -> bool {
        self.expires_at - EXPIRY_MARGIN_SECONDS <= now
    }
}

/// A validated registration.
#[derive(Debug, Clone, Copy)]
pub struct SignUpRequest<'a> {
    pub phone: &'a UkPhone,
    pub password: &'a Password,
    pub display_name: Option<&'a DisplayName>,
    pub role: Role,
}

/// Result of a sign up: a session only when the provider auto-confirms.
#[derive(Debug, Clone, Default)]
pub struct SignUpResponse {
    pub session: Option<AuthSession>,
}

/// Application profile row, keyed by user ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileRecord {
    pub user_id: UserId,
    pub role: Role,
    pub full_name: Option<String>,
}

impl ProfileRecord {
    /// Profile for `user` from the metadata given at sign up.
    #[must_use]
    pub fn from_user(user: &AuthUser) -> Self {
        Self {
            user_id: user.id,
            role: user.metadata.role(),
            full_name: user.metadata.username.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(metadata: UserMetadata) -> AuthUser {
        AuthUser {
            id: UserId::new(uuid::Uuid::nil()),
            phone: Some("447911123456".to_string()),
            metadata,
        }
    }

    #[test]
    fn test_profile_defaults_to_professional() {
        let profile = ProfileRecord::from_user(&user(UserMetadata::default()));
        assert_eq!(profile.role, Role::Professional);
        assert_eq!(profile.full_name, None);
    }

    #[test]
    fn test_profile_uses_metadata() {
        let profile = ProfileRecord::from_user(&user(UserMetadata {
            username: Some("Ama".to_string()),
            role: Some("customer".to_string()),
        }));
        assert_eq!(profile.role, Role::Customer);
        assert_eq!(profile.full_name.as_deref(), Some("Ama"));
    }

    #[test]
    fn test_profile_serializes_as_row() {
        let profile = ProfileRecord::from_user(&user(UserMetadata::default()));
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "user_id": "00000000-0000-0000-0000-000000000000",
                "role": "professional",
                "full_name": null
            })
        );
    }

    #[test]
    fn test_user_parses_provider_shape() {
        let json = r#"{
            "id": "5b0c2f0e-8d7a-4a43-9a51-6d1c7b8f2e11",
            "phone": "447911123456",
            "user_metadata": {"username": "Ama", "role": "professional"},
            "aud": "authenticated"
        }"#;
        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.metadata.username.as_deref(), Some("Ama"));
    }

    #[test]
    fn test_session_expiry_margin() {
        let session = AuthSession {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: 1_000,
            user: None,
        };
        assert!(!session.is_expired(900));
        assert!(session.is_expired(995));
        assert!(session.is_expired(1_000));
    }

    #[test]
    fn test_session_debug_redacts_tokens() {
        let session = AuthSession {
            access_token: "secret-access".to_string(),
            refresh_token: "secret-refresh".to_string(),
            expires_at: 0,
            user: None,
        };
        let debug = format!("{session:?}");
        assert!(!debug.contains("secret-access"));
        assert!(!debug.contains("secret-refresh"));
    }
}
