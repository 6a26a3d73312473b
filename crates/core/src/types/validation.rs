//! Input validation errors.

use thiserror::Error;

/// A credential field failed validation.
///
/// The `Display` output is the exact message surfaced to the user, so
/// variants are worded for end users rather than operators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Phone is missing or too short to be a phone number at all.
    #[error("Phone is required")]
    PhoneRequired,

    /// Phone does not match `+44` followed by 9-10 digits.
    #[error("Use a UK phone starting with +44")]
    PhoneNotUk,

    /// Password shorter than the minimum length.
    #[error("Password must be at least 6 chars")]
    PasswordTooShort,

    /// OTP token empty after trimming.
    #[error("Enter the OTP code you received")]
    OtpMissing,

    /// Role is not one of the accepted values.
    #[error("Invalid enum value. Expected 'customer' | 'professional', received '{received}'")]
    InvalidRole {
        /// The value that was submitted.
        received: String,
    },
}
