//! Display name type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Optional public display name chosen at signup.
///
/// Never fails validation: input is trimmed and truncated to
/// [`DisplayName::MAX_LENGTH`] characters, and empty input means "no name".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Maximum length, in characters.
    pub const MAX_LENGTH: usize = 50;

    /// Normalize raw form input into an optional display name.
    #[must_use]
    pub fn parse_optional(s: Option<&str>) -> Option<Self> {
        let truncated: String = s?.trim().chars().take(Self::MAX_LENGTH).collect();
        let truncated = truncated.trim_end();
        if truncated.is_empty() {
            None
        } else {
            Some(Self(truncated.to_owned()))
        }
    }

    /// Returns the display name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
