//! Supabase auth and REST API client.
//!
//! # APIs
//!
//! ## Auth (GoTrue)
//! - Phone + password sign up with SMS one-time codes
//! - Password and refresh-token grants
//! - Current user lookup and logout
//!
//! ## REST (PostgREST)
//! - `profiles` upsert keyed by `user_id`
//!
//! Every request carries the project's anon key as `apikey`; user-scoped
//! calls add the user's access token as a bearer token.

mod client;
pub mod types;

pub use client::SupabaseClient;

use thiserror::Error;

use crate::services::identity::ProviderError;

/// Errors that can occur when calling Supabase.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be built from configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<SupabaseError> for ProviderError {
    fn from(err: SupabaseError) -> Self {
        match err {
            SupabaseError::Api { status, message } => Self::Rejected { status, message },
            SupabaseError::Http(e) => Self::Unavailable(format!("Auth service unreachable: {e}")),
            other => Self::Unavailable(other.to_string()),
        }
    }
}
