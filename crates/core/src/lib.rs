//! Ghanovia Core - Shared types library.
//!
//! This crate provides the pure building blocks used by the onboarding
//! service:
//! - `types` - Validated input newtypes (phone, password, OTP, role) and the
//!   uniform action outcome
//! - `onboarding` - The "become a pro" multi-step wizard
//!
//! # Architecture
//!
//! The core crate contains only types and state machines - no I/O, no HTTP
//! clients, no session handling. Everything here can be unit tested without
//! a runtime.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod onboarding;
pub mod types;

pub use types::*;
