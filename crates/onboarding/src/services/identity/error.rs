//! Identity error types.

use thiserror::Error;

/// A failure reported by (or while reaching) the identity provider.
///
/// `Display` is the message shown to the user: the provider's own wording
/// for rejections, passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider answered with an error (bad credentials, expired code,
    /// duplicate phone, ...).
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The provider could not be reached or its answer could not be read.
    #[error("{0}")]
    Unavailable(String),
}

impl ProviderError {
    /// HTTP status of a rejection, if there was one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Unavailable(_) => None,
        }
    }

    /// Whether the provider says the access token is already invalid, in
    /// which case the session is as good as terminated.
    #[must_use]
    pub const fn is_session_gone(&self) -> bool {
        matches!(self.status(), Some(401 | 403 | 404))
    }
}

/// Profile reconciliation failed after a successful verification.
///
/// Never shown to the user; logged and dropped by the caller.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    /// The freshly verified user could not be fetched.
    #[error("failed to load verified user: {0}")]
    UserLookup(#[source] ProviderError),

    /// The profile row could not be written.
    #[error("failed to upsert profile: {0}")]
    Upsert(#[source] ProviderError),
}
