//! One-time password token type.

use core::fmt;

use super::ValidationError;

/// An SMS one-time password as typed by the user.
///
/// The token is opaque to this crate; only the identity provider knows
/// whether it is correct. Parsing only guarantees it is non-empty and at
/// most [`OtpToken::MAX_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpToken(String);

impl OtpToken {
    /// Longer input is truncated, not rejected.
    pub const MAX_LENGTH: usize = 8;

    /// Parse an `OtpToken` from raw form input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OtpMissing`] if the input is absent or
    /// blank after trimming.
    pub fn parse(s: Option<&str>) -> Result<Self, ValidationError> {
        let token: String = s
            .unwrap_or_default()
            .trim()
            .chars()
            .take(Self::MAX_LENGTH)
            .collect();
        if token.is_empty() {
            return Err(ValidationError::OtpMissing);
        }
        Ok(Self(token))
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OtpToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
