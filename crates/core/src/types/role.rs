//! Account role.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Role chosen at signup.
///
/// Stored as pending user metadata at registration and copied onto the
/// profile row after phone verification. Accounts without a recorded role
/// are treated as professionals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Looking to hire pros.
    Customer,
    /// Offering services.
    #[default]
    Professional,
}

impl Role {
    /// Parse a `Role` from its wire name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRole`] for anything other than
    /// `customer` or `professional` (case-sensitive, no trimming).
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "customer" => Ok(Self::Customer),
            "professional" => Ok(Self::Professional),
            other => Err(ValidationError::InvalidRole {
                received: other.to_owned(),
            }),
        }
    }

    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Professional => "professional",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Role::parse("customer").unwrap(), Role::Customer);
        assert_eq!(Role::parse("professional").unwrap(), Role::Professional);
    }

    #[test]
    fn test_parse_rejects_other_values() {
        for value in ["admin", "", "Customer", " customer"] {
            assert!(
                matches!(Role::parse(value), Err(ValidationError::InvalidRole { .. })),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_message_names_received_value() {
        let err = Role::parse("admin").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid enum value. Expected 'customer' | 'professional', received 'admin'"
        );
    }

    #[test]
    fn test_default_is_professional() {
        assert_eq!(Role::default(), Role::Professional);
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Customer).unwrap(),
            "\"customer\""
        );
        let role: Role = serde_json::from_str("\"professional\"").unwrap();
        assert_eq!(role, Role::Professional);
    }
}
