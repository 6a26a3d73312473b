//! Password type.

use secrecy::{ExposeSecret, SecretString};

use super::ValidationError;

/// A password that passed the minimum length check.
///
/// The value is held in a [`SecretString`] so it never shows up in `Debug`
/// output or logs. Hashing and storage belong to the identity provider.
#[derive(Debug, Clone)]
pub struct Password(SecretString);

impl Password {
    /// Minimum password length, in characters.
    pub const MIN_LENGTH: usize = 6;

    /// Parse a `Password` from raw form input.
    ///
    /// The input is trimmed before the length check.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PasswordTooShort`] if the trimmed input has
    /// fewer than [`Self::MIN_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.chars().count() < Self::MIN_LENGTH {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(Self(SecretString::from(trimmed)))
    }

    /// Expose the password for sending to the identity provider.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}
