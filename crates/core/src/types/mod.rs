//! Core types for Ghanovia.
//!
//! Every user-supplied credential field has a newtype with a `parse`
//! constructor. Parsing trims the raw input and either returns the
//! normalized value or a [`ValidationError`] carrying the message shown to
//! the user.

pub mod id;
pub mod otp;
pub mod outcome;
pub mod password;
pub mod phone;
pub mod role;
pub mod username;
pub mod validation;

pub use id::UserId;
pub use otp::OtpToken;
pub use outcome::ActionOutcome;
pub use password::Password;
pub use phone::UkPhone;
pub use role::Role;
pub use username::DisplayName;
pub use validation::ValidationError;
