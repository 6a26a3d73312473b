//! Authentication route handlers.
//!
//! Sign up, phone verification, sign in and sign out. Each POST runs the
//! matching action from [`crate::actions`]. Failures re-render the form with
//! the message and the visitor's input; successes redirect (303) and carry
//! the message to the next page as a flash.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use ghanovia_core::{ActionOutcome, Role};
use serde::Deserialize;
use tower_sessions::Session;

use crate::actions::{self, SignInForm, SignUpForm, VerifyForm};
use crate::error::Result;
use crate::filters;
use crate::middleware::{GuestOnly, SIGNED_IN_HOME, TowerSessionStorage, set_flash, take_flash};
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the verify page.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyQuery {
    #[serde(default)]
    pub phone: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Sign up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignUpTemplate {
    pub outcome: ActionOutcome,
    pub phone: String,
    pub username: String,
    pub role: String,
}

impl Default for SignUpTemplate {
    fn default() -> Self {
        Self {
            outcome: ActionOutcome::Idle,
            phone: String::new(),
            username: String::new(),
            role: Role::default().as_str().to_string(),
        }
    }
}

/// Verify page template.
#[derive(Template, WebTemplate, Default)]
#[template(path = "auth/verify.html")]
pub struct VerifyTemplate {
    pub outcome: ActionOutcome,
    pub phone: String,
}

/// Sign in page template.
#[derive(Template, WebTemplate, Default)]
#[template(path = "auth/signin.html")]
pub struct SignInTemplate {
    pub outcome: ActionOutcome,
    pub phone: String,
}

/// Where to verify the phone that just signed up.
fn verify_location(phone: &str) -> String {
    let phone = phone.trim();
    if phone.is_empty() {
        "/auth/verify".to_string()
    } else {
        format!("/auth/verify?phone={}", urlencoding::encode(phone))
    }
}

// =============================================================================
// Sign Up
// =============================================================================

/// Display the sign up page.
pub async fn signup_page(_guest: GuestOnly, session: Session) -> Result<SignUpTemplate> {
    Ok(SignUpTemplate {
        outcome: take_flash(&session).await?,
        ..SignUpTemplate::default()
    })
}

/// Handle sign up form submission.
///
/// On success the OTP has been sent and the visitor moves on to verify it.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignUpForm>,
) -> Result<Response> {
    let storage = TowerSessionStorage::new(session.clone());
    let outcome = ActionOutcome::from_result(actions::sign_up(&state.gateway(&storage), &form).await);

    if outcome.is_success() {
        set_flash(&session, &outcome).await?;
        return Ok(Redirect::to(&verify_location(&form.phone)).into_response());
    }

    Ok(SignUpTemplate {
        outcome,
        phone: form.phone,
        username: form.username.unwrap_or_default(),
        role: form
            .role
            .unwrap_or_else(|| Role::default().as_str().to_string()),
    }
    .into_response())
}

// =============================================================================
// Verify
// =============================================================================

/// Display the verify page with the phone pre-filled from the query.
pub async fn verify_page(
    _guest: GuestOnly,
    session: Session,
    Query(query): Query<VerifyQuery>,
) -> Result<VerifyTemplate> {
    Ok(VerifyTemplate {
        outcome: take_flash(&session).await?,
        phone: query.phone.unwrap_or_default(),
    })
}

/// Handle OTP submission.
pub async fn verify(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<VerifyForm>,
) -> Result<Response> {
    let storage = TowerSessionStorage::new(session.clone());
    let outcome = ActionOutcome::from_result(actions::verify_otp(&state.gateway(&storage), &form).await);

    if outcome.is_success() {
        set_flash(&session, &outcome).await?;
        return Ok(Redirect::to(SIGNED_IN_HOME).into_response());
    }

    Ok(VerifyTemplate {
        outcome,
        phone: form.phone,
    }
    .into_response())
}

// =============================================================================
// Sign In / Sign Out
// =============================================================================

/// Display the sign in page.
pub async fn signin_page(_guest: GuestOnly, session: Session) -> Result<SignInTemplate> {
    Ok(SignInTemplate {
        outcome: take_flash(&session).await?,
        phone: String::new(),
    })
}

/// Handle sign in form submission.
pub async fn signin(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignInForm>,
) -> Result<Response> {
    let storage = TowerSessionStorage::new(session.clone());
    let outcome = ActionOutcome::from_result(actions::sign_in(&state.gateway(&storage), &form).await);

    if outcome.is_success() {
        set_flash(&session, &outcome).await?;
        return Ok(Redirect::to(SIGNED_IN_HOME).into_response());
    }

    Ok(SignInTemplate {
        outcome,
        phone: form.phone,
    }
    .into_response())
}

/// Handle sign out.
///
/// Always lands on the sign in page; the outcome travels as a flash. If the
/// provider refused, the session is still live and the guest guard forwards
/// the visitor on, flash intact.
pub async fn signout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let storage = TowerSessionStorage::new(session.clone());
    let outcome = ActionOutcome::from_result(actions::sign_out(&state.gateway(&storage)).await);

    set_flash(&session, &outcome).await?;
    Ok(Redirect::to("/auth/signin"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_location_encodes_phone() {
        assert_eq!(
            verify_location(" +447911123456 "),
            "/auth/verify?phone=%2B447911123456"
        );
    }

    #[test]
    fn test_verify_location_without_phone() {
        assert_eq!(verify_location("   "), "/auth/verify");
    }

    #[test]
    fn test_signup_template_defaults_to_professional() {
        assert_eq!(SignUpTemplate::default().role, "professional");
    }
}
