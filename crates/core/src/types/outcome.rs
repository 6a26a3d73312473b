//! Uniform result of a form action.

use serde::{Deserialize, Serialize};

/// What a form action reports back to the page that submitted it.
///
/// On the wire this is the two-field shape `{ "error"?: ..., "success"?: ... }`.
/// The enum makes "both set" unrepresentable; `Idle` (neither set) is the
/// state before the first submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "OutcomeFields", into = "OutcomeFields")]
pub enum ActionOutcome {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// The action failed; message is user-facing.
    Error(String),
    /// The action succeeded; message is user-facing.
    Success(String),
}

impl ActionOutcome {
    /// Build an error outcome.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// Build a success outcome.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success(message.into())
    }

    /// Reduce an action result to an outcome, using the error's `Display`
    /// as the message.
    #[must_use]
    pub fn from_result<E: std::fmt::Display>(result: Result<&str, E>) -> Self {
        match result {
            Ok(message) => Self::success(message),
            Err(err) => Self::error(err.to_string()),
        }
    }

    /// The error message, if this is an error outcome.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// The success message, if this is a success outcome.
    #[must_use]
    pub fn success_message(&self) -> Option<&str> {
        match self {
            Self::Success(message) => Some(message),
            _ => None,
        }
    }

    /// Whether the action succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Whether the action failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Wire representation of [`ActionOutcome`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct OutcomeFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    success: Option<String>,
}

impl From<OutcomeFields> for ActionOutcome {
    // An error wins if a peer sends both.
    fn from(fields: OutcomeFields) -> Self {
        match (fields.error, fields.success) {
            (Some(error), _) => Self::Error(error),
            (None, Some(success)) => Self::Success(success),
            (None, None) => Self::Idle,
        }
    }
}

impl From<ActionOutcome> for OutcomeFields {
    fn from(outcome: ActionOutcome) -> Self {
        match outcome {
            ActionOutcome::Idle => Self::default(),
            ActionOutcome::Error(error) => Self {
                error: Some(error),
                success: None,
            },
            ActionOutcome::Success(success) => Self {
                error: None,
                success: Some(success),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_at_most_one_field() {
        let json = serde_json::to_value(ActionOutcome::success("Signed in.")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": "Signed in." }));

        let json = serde_json::to_value(ActionOutcome::error("nope")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "nope" }));

        let json = serde_json::to_value(ActionOutcome::Idle).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_deserialize_prefers_error() {
        let outcome: ActionOutcome =
            serde_json::from_str(r#"{"error":"bad","success":"good"}"#).unwrap();
        assert_eq!(outcome, ActionOutcome::error("bad"));
    }

    #[test]
    fn test_deserialize_empty_is_idle() {
        let outcome: ActionOutcome = serde_json::from_str("{}").unwrap();
        assert_eq!(outcome, ActionOutcome::Idle);
    }

    #[test]
    fn test_from_result() {
        let ok: Result<&str, String> = Ok("done");
        assert_eq!(ActionOutcome::from_result(ok), ActionOutcome::success("done"));

        let err: Result<&str, String> = Err("broken".to_owned());
        assert_eq!(ActionOutcome::from_result(err), ActionOutcome::error("broken"));
    }

    #[test]
    fn test_accessors() {
        let outcome = ActionOutcome::error("x");
        assert_eq!(outcome.error_message(), Some("x"));
        assert_eq!(outcome.success_message(), None);
        assert!(outcome.is_error());
        assert!(!outcome.is_success());
        assert!(!ActionOutcome::Idle.is_error());
    }
}
