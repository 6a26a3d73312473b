//! HTTP middleware stack for onboarding.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, framing, caching)
//! 5. Session layer (tower-sessions with in-memory store)
//!
//! Guest-only screens use the [`GuestOnly`] extractor rather than a layer.

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{GuestOnly, OptionalUser, SIGNED_IN_HOME};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{TowerSessionStorage, create_session_layer, set_flash, take_flash};
