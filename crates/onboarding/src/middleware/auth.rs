//! Authentication extractors.
//!
//! The signed-in user is whoever the identity gateway reports for the
//! visitor's session, so both extractors go through
//! [`crate::state::AppState::gateway`] rather than reading the session
//! directly. That keeps token refresh in one place.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::session::TowerSessionStorage;
use crate::services::identity::AuthUser;
use crate::state::AppState;

/// Where signed-in visitors are sent from the auth screens.
pub const SIGNED_IN_HOME: &str = "/become-pro";

/// Extractor that only admits visitors without a session.
///
/// Signed-in visitors are redirected to [`SIGNED_IN_HOME`] before the
/// handler runs.
///
/// # Example
///
/// ```rust,ignore
/// async fn signup_page(_guest: GuestOnly) -> impl IntoResponse {
///     SignUpTemplate::default()
/// }
/// ```
pub struct GuestOnly;

/// Rejection for [`GuestOnly`].
#[derive(Debug)]
pub enum GuestRejection {
    /// Visitor already has a session.
    SignedIn,
    /// Session layer missing from the stack.
    NoSession,
}

impl IntoResponse for GuestRejection {
    fn into_response(self) -> Response {
        match self {
            Self::SignedIn => Redirect::to(SIGNED_IN_HOME).into_response(),
            Self::NoSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for GuestOnly {
    type Rejection = GuestRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(GuestRejection::NoSession)?;

        let storage = TowerSessionStorage::new(session);
        match state.gateway(&storage).current_user().await {
            Some(user) => {
                tracing::debug!(user_id = %user.id, "Signed-in visitor sent away from auth screen");
                Err(GuestRejection::SignedIn)
            }
            None => Ok(Self),
        }
    }
}

/// Extractor that optionally gets the signed-in user.
///
/// Never rejects; a missing session layer reads as signed out.
pub struct OptionalUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>().cloned() else {
            return Ok(Self(None));
        };

        let storage = TowerSessionStorage::new(session);
        Ok(Self(state.gateway(&storage).current_user().await))
    }
}
