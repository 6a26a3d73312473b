//! Server actions behind the auth forms.
//!
//! Each action validates its form (first failing field wins), makes exactly
//! one gateway call and reports a static success message or the error's
//! display text. Nothing escapes as a panic or an HTTP error; callers turn
//! the result into a [`ghanovia_core::ActionOutcome`].

use ghanovia_core::{DisplayName, OtpToken, Password, Role, UkPhone, ValidationError};
use serde::Deserialize;
use thiserror::Error;

use crate::error::add_breadcrumb;
use crate::services::identity::{IdentityGateway, ProviderError};

pub const SIGN_UP_SUCCESS: &str = "OTP sent. Check your phone for the code.";
pub const VERIFY_SUCCESS: &str = "Phone verified and session started.";
pub const SIGN_IN_SUCCESS: &str = "Signed in.";
pub const SIGN_OUT_SUCCESS: &str = "Signed out.";

/// Why an action failed. `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Result of an action: a success message or the reason it failed.
pub type ActionResult = Result<&'static str, ActionError>;

// =============================================================================
// Form Types
// =============================================================================

/// Sign up form data.
#[derive(Debug, Default, Deserialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// OTP verification form data.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyForm {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// Sign in form data.
#[derive(Debug, Default, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
}

// =============================================================================
// Actions
// =============================================================================

/// Register a phone + password account and send the OTP.
///
/// # Errors
///
/// Returns the first validation failure, or the provider's rejection.
pub async fn sign_up(gateway: &IdentityGateway<'_>, form: &SignUpForm) -> ActionResult {
    let phone = UkPhone::parse(&form.phone)?;
    let password = Password::parse(&form.password)?;
    let display_name = DisplayName::parse_optional(form.username.as_deref());
    let role = Role::parse(form.role.as_deref().unwrap_or_default())?;

    add_breadcrumb("auth", "Sign up requested", Some(&[("role", role.as_str())]));

    gateway
        .register(&phone, &password, display_name.as_ref(), role)
        .await
        .inspect_err(|err| tracing::warn!(error = %err, "Sign up rejected"))?;

    Ok(SIGN_UP_SUCCESS)
}

/// Verify the OTP, start the session and write the profile row.
///
/// A failed profile write is logged and does not fail verification.
///
/// # Errors
///
/// Returns the first validation failure, or the provider's rejection of the
/// code. A blank code is reported before the phone is looked at.
pub async fn verify_otp(gateway: &IdentityGateway<'_>, form: &VerifyForm) -> ActionResult {
    let token = OtpToken::parse(form.token.as_deref())?;
    let phone = UkPhone::parse(&form.phone)?;

    let session = gateway
        .verify_challenge(&phone, &token)
        .await
        .inspect_err(|err| tracing::warn!(error = %err, "OTP verification rejected"))?;

    add_breadcrumb("auth", "Phone verified", None);

    if let Err(err) = gateway.reconcile_profile(&session).await {
        tracing::warn!(error = %err, "Profile reconciliation failed after verification");
    }

    Ok(VERIFY_SUCCESS)
}

/// Start a session with phone + password.
///
/// # Errors
///
/// Returns the first validation failure, or the provider's rejection.
pub async fn sign_in(gateway: &IdentityGateway<'_>, form: &SignInForm) -> ActionResult {
    let phone = UkPhone::parse(&form.phone)?;
    let password = Password::parse(&form.password)?;

    gateway
        .authenticate(&phone, &password)
        .await
        .inspect_err(|err| tracing::warn!(error = %err, "Sign in rejected"))?;

    add_breadcrumb("auth", "Signed in", None);
    Ok(SIGN_IN_SUCCESS)
}

/// End the current session.
///
/// # Errors
///
/// Returns the provider's failure to revoke the session.
pub async fn sign_out(gateway: &IdentityGateway<'_>) -> ActionResult {
    gateway
        .terminate()
        .await
        .inspect_err(|err| tracing::warn!(error = %err, "Sign out failed"))?;

    add_breadcrumb("auth", "Signed out", None);
    Ok(SIGN_OUT_SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ghanovia_core::ActionOutcome;

    use super::*;
    use crate::services::identity::testing::FakeProvider;
    use crate::services::identity::{MemorySessionStorage, SESSION_KEY, SessionStorage};

    fn signup_form(phone: &str, password: &str, role: &str) -> SignUpForm {
        SignUpForm {
            phone: phone.to_string(),
            password: password.to_string(),
            username: None,
            role: Some(role.to_string()),
        }
    }

    async fn run_sign_up(provider: &FakeProvider, form: &SignUpForm) -> ActionOutcome {
        let storage = MemorySessionStorage::new();
        let gateway = IdentityGateway::new(provider, provider, &storage);
        ActionOutcome::from_result(sign_up(&gateway, form).await)
    }

    #[tokio::test]
    async fn test_sign_up_success() {
        let provider = FakeProvider::default();
        let outcome = run_sign_up(
            &provider,
            &signup_form("+447911123456", "secret1", "professional"),
        )
        .await;

        assert_eq!(outcome, ActionOutcome::success(SIGN_UP_SUCCESS));
        assert_eq!(
            provider.calls(),
            vec!["sign_up:+447911123456::professional".to_string()]
        );
    }

    #[tokio::test]
    async fn test_sign_up_rejects_non_uk_phone_without_calling_provider() {
        let provider = FakeProvider::default();
        let outcome =
            run_sign_up(&provider, &signup_form("07911123456", "secret1", "customer")).await;

        assert_eq!(
            outcome.error_message(),
            Some("Use a UK phone starting with +44")
        );
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sign_up_first_error_wins() {
        let provider = FakeProvider::default();
        let outcome = run_sign_up(&provider, &signup_form("", "123", "admin")).await;

        assert_eq!(outcome.error_message(), Some("Phone is required"));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_sign_up_short_password() {
        let provider = FakeProvider::default();
        let outcome = run_sign_up(
            &provider,
            &signup_form("+447911123456", "  12345  ", "customer"),
        )
        .await;

        assert_eq!(
            outcome.error_message(),
            Some("Password must be at least 6 chars")
        );
    }

    #[tokio::test]
    async fn test_sign_up_invalid_role() {
        let provider = FakeProvider::default();
        let outcome =
            run_sign_up(&provider, &signup_form("+447911123456", "secret1", "admin")).await;

        assert_eq!(
            outcome.error_message(),
            Some("Invalid enum value. Expected 'customer' | 'professional', received 'admin'")
        );
    }

    #[tokio::test]
    async fn test_sign_up_trims_and_truncates_username() {
        let provider = FakeProvider::default();
        let mut form = signup_form("+447911123456", "secret1", "customer");
        form.username = Some(format!("  {}  ", "a".repeat(60)));

        run_sign_up(&provider, &form).await;

        assert_eq!(
            provider.calls(),
            vec![format!("sign_up:+447911123456:{}:customer", "a".repeat(50))]
        );
    }

    #[tokio::test]
    async fn test_sign_up_passes_provider_message_through() {
        let provider = FakeProvider::rejecting("User already registered");
        let outcome = run_sign_up(
            &provider,
            &signup_form("+447911123456", "secret1", "customer"),
        )
        .await;

        assert_eq!(outcome, ActionOutcome::error("User already registered"));
    }

    #[tokio::test]
    async fn test_verify_requires_token() {
        let provider = FakeProvider::default();
        let storage = MemorySessionStorage::new();
        let gateway = IdentityGateway::new(&provider, &provider, &storage);

        let form = VerifyForm {
            phone: "+447911123456".to_string(),
            token: Some("   ".to_string()),
        };
        let outcome = ActionOutcome::from_result(verify_otp(&gateway, &form).await);

        assert_eq!(
            outcome.error_message(),
            Some("Enter the OTP code you received")
        );
        assert!(provider.calls().is_empty());
    }

    async fn run_verify(
        provider: &FakeProvider,
        phone: &str,
        token: Option<&str>,
    ) -> ActionOutcome {
        let storage = MemorySessionStorage::new();
        let gateway = IdentityGateway::new(provider, provider, &storage);
        let form = VerifyForm {
            phone: phone.to_string(),
            token: token.map(str::to_string),
        };
        ActionOutcome::from_result(verify_otp(&gateway, &form).await)
    }

    #[tokio::test]
    async fn test_verify_blank_token_reported_before_bad_phone() {
        let provider = FakeProvider::default();

        let outcome = run_verify(&provider, "07911123456", Some("  ")).await;
        assert_eq!(
            outcome.error_message(),
            Some("Enter the OTP code you received")
        );

        let outcome = run_verify(&provider, "", None).await;
        assert_eq!(
            outcome.error_message(),
            Some("Enter the OTP code you received")
        );
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_verify_rejects_non_uk_phone_without_calling_provider() {
        let provider = FakeProvider::default();
        let outcome = run_verify(&provider, "+15551234567", Some("123456")).await;

        assert_eq!(
            outcome.error_message(),
            Some("Use a UK phone starting with +44")
        );
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_verify_truncates_token_and_upserts_profile() {
        let provider = FakeProvider::default();
        let storage = MemorySessionStorage::new();
        let gateway = IdentityGateway::new(&provider, &provider, &storage);

        let form = VerifyForm {
            phone: " +447911123456 ".to_string(),
            token: Some(" 1234567890 ".to_string()),
        };
        let result = verify_otp(&gateway, &form).await.unwrap();

        assert_eq!(result, VERIFY_SUCCESS);
        let calls = provider.calls();
        assert_eq!(calls.first().map(String::as_str), Some("verify:+447911123456:12345678"));
        assert_eq!(provider.profiles().len(), 1);
        assert!(storage.get(SESSION_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_verify_succeeds_when_reconciliation_fails() {
        let provider = FakeProvider::default().failing_get_user();
        let storage = MemorySessionStorage::new();
        let gateway = IdentityGateway::new(&provider, &provider, &storage);

        let form = VerifyForm {
            phone: "+447911123456".to_string(),
            token: Some("123456".to_string()),
        };
        let outcome = ActionOutcome::from_result(verify_otp(&gateway, &form).await);

        assert_eq!(outcome, ActionOutcome::success(VERIFY_SUCCESS));
        assert!(provider.profiles().is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_success_and_rejection() {
        let form = SignInForm {
            phone: "+447911123456".to_string(),
            password: "secret1".to_string(),
        };

        let provider = FakeProvider::default();
        let storage = MemorySessionStorage::new();
        let gateway = IdentityGateway::new(&provider, &provider, &storage);
        assert_eq!(sign_in(&gateway, &form).await.unwrap(), SIGN_IN_SUCCESS);

        let provider = FakeProvider::rejecting("Invalid login credentials");
        let gateway = IdentityGateway::new(&provider, &provider, &storage);
        let outcome = ActionOutcome::from_result(sign_in(&gateway, &form).await);
        assert_eq!(outcome, ActionOutcome::error("Invalid login credentials"));
    }

    #[tokio::test]
    async fn test_sign_in_validates_before_calling_provider() {
        let provider = FakeProvider::default();
        let storage = MemorySessionStorage::new();
        let gateway = IdentityGateway::new(&provider, &provider, &storage);

        let form = SignInForm {
            phone: "07911123456".to_string(),
            password: "secret1".to_string(),
        };
        let outcome = ActionOutcome::from_result(sign_in(&gateway, &form).await);
        assert_eq!(
            outcome.error_message(),
            Some("Use a UK phone starting with +44")
        );

        let form = SignInForm {
            phone: "+447911123456".to_string(),
            password: "12345".to_string(),
        };
        let outcome = ActionOutcome::from_result(sign_in(&gateway, &form).await);
        assert_eq!(
            outcome.error_message(),
            Some("Password must be at least 6 chars")
        );

        assert!(provider.calls().is_empty());
        assert_eq!(storage.get(SESSION_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_out() {
        let provider = FakeProvider::default();
        let storage = MemorySessionStorage::new();
        let gateway = IdentityGateway::new(&provider, &provider, &storage);

        assert_eq!(sign_out(&gateway).await.unwrap(), SIGN_OUT_SUCCESS);
    }

    #[test]
    fn test_form_ignores_previous_state_field() {
        let form: SignInForm = serde_json::from_value(serde_json::json!({
            "_prev": {"error": "old"},
            "phone": "+447911123456",
            "password": "secret1"
        }))
        .unwrap();
        assert_eq!(form.phone, "+447911123456");
    }
}
