//! HTTP route handlers for onboarding.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to /auth/signup
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Identity provider reachability
//!
//! # Auth (pages are guest only)
//! GET  /auth/signup            - Sign up page
//! POST /auth/signup            - Sign up action (303 to /auth/verify?phone=...)
//! GET  /auth/verify            - Verify page, phone from ?phone=
//! POST /auth/verify            - Verify action (303 to /become-pro)
//! GET  /auth/signin            - Sign in page
//! POST /auth/signin            - Sign in action (303 to /become-pro)
//! POST /auth/signout           - Sign out action (303 to /auth/signin)
//!
//! # Pro onboarding
//! GET  /become-pro             - Wizard, first step
//! POST /become-pro             - Wizard transition (intent = next | back | submit)
//!
//! # Auth API (form or JSON in, ActionOutcome JSON out)
//! POST /api/auth/signup
//! POST /api/auth/verify
//! POST /api/auth/signin
//! POST /api/auth/signout
//! ```

pub mod api;
pub mod auth;
pub mod become_pro;
pub mod health;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/verify", get(auth::verify_page).post(auth::verify))
        .route("/signin", get(auth::signin_page).post(auth::signin))
        .route("/signout", post(auth::signout))
}

/// Create the auth API routes router.
pub fn auth_api_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(api::auth::signup))
        .route("/verify", post(api::auth::verify))
        .route("/signin", post(api::auth::signin))
        .route("/signout", post(api::auth::signout))
}

/// Create all routes for onboarding.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/auth/signup") }))
        .route(
            "/become-pro",
            get(become_pro::show).post(become_pro::transition),
        )
        .nest("/auth", auth_routes())
        .nest("/api/auth", auth_api_routes())
}
