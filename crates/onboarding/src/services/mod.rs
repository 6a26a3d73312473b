//! Business logic services for the onboarding server.
//!
//! # Services
//!
//! - `identity` - Sign up, phone verification, sessions and profile reconciliation

pub mod identity;
