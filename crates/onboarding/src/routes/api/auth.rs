//! Auth action API.
//!
//! Every endpoint answers 200 with the action's outcome; failures are
//! reported in the body, not the status.

use axum::{Json, extract::State};
use ghanovia_core::ActionOutcome;
use tower_sessions::Session;

use super::FormOrJson;
use crate::actions::{self, SignInForm, SignUpForm, VerifyForm};
use crate::middleware::TowerSessionStorage;
use crate::state::AppState;

/// `POST /api/auth/signup`
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    FormOrJson(form): FormOrJson<SignUpForm>,
) -> Json<ActionOutcome> {
    let storage = TowerSessionStorage::new(session);
    Json(ActionOutcome::from_result(
        actions::sign_up(&state.gateway(&storage), &form).await,
    ))
}

/// `POST /api/auth/verify`
pub async fn verify(
    State(state): State<AppState>,
    session: Session,
    FormOrJson(form): FormOrJson<VerifyForm>,
) -> Json<ActionOutcome> {
    let storage = TowerSessionStorage::new(session);
    Json(ActionOutcome::from_result(
        actions::verify_otp(&state.gateway(&storage), &form).await,
    ))
}

/// `POST /api/auth/signin`
pub async fn signin(
    State(state): State<AppState>,
    session: Session,
    FormOrJson(form): FormOrJson<SignInForm>,
) -> Json<ActionOutcome> {
    let storage = TowerSessionStorage::new(session);
    Json(ActionOutcome::from_result(
        actions::sign_in(&state.gateway(&storage), &form).await,
    ))
}

/// `POST /api/auth/signout`
pub async fn signout(State(state): State<AppState>, session: Session) -> Json<ActionOutcome> {
    let storage = TowerSessionStorage::new(session);
    Json(ActionOutcome::from_result(
        actions::sign_out(&state.gateway(&storage)).await,
    ))
}
