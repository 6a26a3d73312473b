//! UK phone number type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// `+44` followed by 9 or 10 ASCII digits.
static UK_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // literal pattern
    Regex::new(r"^\+44[0-9]{9,10}$").unwrap()
});

/// A UK phone number in E.164 form.
///
/// ## Constraints
///
/// - Surrounding whitespace is trimmed before checking
/// - At least 8 characters (anything shorter is treated as missing)
/// - Must match `^\+44\d{9,10}$`
///
/// ## Examples
///
/// ```
/// use ghanovia_core::UkPhone;
///
/// assert!(UkPhone::parse("+447911123456").is_ok());
/// assert!(UkPhone::parse(" +447911123456 ").is_ok());
///
/// assert!(UkPhone::parse("").is_err());            // missing
/// assert!(UkPhone::parse("07911123456").is_err()); // no country code
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UkPhone(String);

impl UkPhone {
    /// Shortest input that is checked against the UK pattern.
    pub const MIN_LENGTH: usize = 8;

    /// Parse a `UkPhone` from raw form input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PhoneRequired`] if the trimmed input is
    /// shorter than [`Self::MIN_LENGTH`], and [`ValidationError::PhoneNotUk`]
    /// if it does not match the UK pattern.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.chars().count() < Self::MIN_LENGTH {
            return Err(ValidationError::PhoneRequired);
        }

        if !UK_PHONE.is_match(trimmed) {
            return Err(ValidationError::PhoneNotUk);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `UkPhone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UkPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for UkPhone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for UkPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
