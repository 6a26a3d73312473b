//! Step-gated wizard state machine.

use thiserror::Error;

use super::{DraftSummary, Field, FieldErrors, ProDraft, Step};

/// Why a submission was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// Submit was attempted before reaching the last step.
    #[error("finish the {} step before submitting", .0.title())]
    NotOnLastStep(Step),

    /// At least one field failed; the wizard moved to the earliest step
    /// with a failing field.
    #[error("{0} field(s) need attention")]
    Invalid(usize),
}

/// The onboarding wizard: current step, draft values, field errors and,
/// once submitted, the summary.
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    step: Step,
    draft: ProDraft,
    errors: FieldErrors,
    summary: Option<DraftSummary>,
}

impl Wizard {
    /// Fresh wizard on the first step with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a wizard from a posted step index and draft. Out-of-range
    /// indices are clamped onto the last step.
    #[must_use]
    pub fn resume(step_index: usize, draft: ProDraft) -> Self {
        Self {
            step: Step::from_index(step_index),
            draft,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub const fn draft(&self) -> &ProDraft {
        &self.draft
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub const fn summary(&self) -> Option<&DraftSummary> {
        self.summary.as_ref()
    }

    /// Move forward if every field on the current step is valid.
    ///
    /// Returns whether the step changed. On failure the wizard stays put
    /// and [`Self::errors`] holds the messages for the current step. On the
    /// last step a successful advance leaves the step unchanged.
    pub fn advance(&mut self) -> bool {
        self.summary = None;
        self.errors = self.draft.validate(self.step.fields());
        if !self.errors.is_empty() {
            return false;
        }

        let next = self.step.next();
        let moved = next != self.step;
        self.step = next;
        moved
    }

    /// Move back one step. Never validates.
    pub fn retreat(&mut self) {
        self.summary = None;
        self.errors = FieldErrors::default();
        self.step = self.step.previous();
    }

    /// Submit the draft from the last step.
    ///
    /// Every field is re-validated, including those on earlier steps, since
    /// a step's fields are only checked when leaving it and a posted form
    /// may carry values that were never checked.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::NotOnLastStep`] when called from an earlier
    /// step, and [`WizardError::Invalid`] when any field fails, in which
    /// case the wizard jumps back to the earliest step with an error.
    pub fn submit(&mut self) -> Result<&DraftSummary, WizardError> {
        self.summary = None;
        if !self.step.is_last() {
            return Err(WizardError::NotOnLastStep(self.step));
        }

        self.errors = self.draft.validate(&Field::ALL);
        if let Some(first) = self.errors.fields().map(Step::of).min_by_key(|s| s.index()) {
            self.step = first;
            return Err(WizardError::Invalid(self.errors.len()));
        }

        Ok(self.summary.insert(DraftSummary::from_draft(&self.draft)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn basics_filled() -> ProDraft {
        ProDraft {
            full_name: "Ama Boateng".to_owned(),
            trade: "Barber".to_owned(),
            service_area: "Birmingham".to_owned(),
            postcode: "B1".to_owned(),
            ..ProDraft::default()
        }
    }

    fn all_filled() -> ProDraft {
        ProDraft {
            experience: "10 years".to_owned(),
            availability: "Weekends".to_owned(),
            bio: "Fades and line-ups".to_owned(),
            phone: "+447911123456".to_owned(),
            ..basics_filled()
        }
    }

    #[test]
    fn test_new_starts_on_basics() {
        let wizard = Wizard::new();
        assert_eq!(wizard.step(), Step::Basics);
        assert!(wizard.errors().is_empty());
        assert!(wizard.summary().is_none());
    }

    #[test]
    fn test_advance_blocked_by_empty_basics() {
        let mut wizard = Wizard::new();
        assert!(!wizard.advance());
        assert_eq!(wizard.step(), Step::Basics);
        assert_eq!(wizard.errors().get(Field::FullName), Some("Name is required"));
        assert_eq!(wizard.errors().get(Field::Trade), Some("Choose your trade"));
    }

    #[test]
    fn test_advance_only_validates_current_step() {
        // Services and contact are empty but must not block leaving basics
        let mut wizard = Wizard::resume(0, basics_filled());
        assert!(wizard.advance());
        assert_eq!(wizard.step(), Step::Services);
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn test_advance_errors_limited_to_current_step() {
        let mut wizard = Wizard::resume(1, ProDraft::default());
        assert!(!wizard.advance());
        assert!(
            wizard
                .errors()
                .fields()
                .all(|field| Step::of(field) == Step::Services)
        );
    }

    #[test]
    fn test_advance_on_last_step_stays() {
        let mut wizard = Wizard::resume(2, all_filled());
        assert!(!wizard.advance());
        assert_eq!(wizard.step(), Step::Contact);
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn test_retreat_ignores_validity() {
        let mut wizard = Wizard::resume(2, ProDraft::default());
        wizard.retreat();
        assert_eq!(wizard.step(), Step::Services);
        wizard.retreat();
        wizard.retreat();
        assert_eq!(wizard.step(), Step::Basics);
    }

    #[test]
    fn test_retreat_clears_errors() {
        let mut wizard = Wizard::resume(1, ProDraft::default());
        wizard.advance();
        assert!(!wizard.errors().is_empty());
        wizard.retreat();
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn test_resume_clamps_index() {
        assert_eq!(Wizard::resume(99, ProDraft::default()).step(), Step::Contact);
    }

    #[test]
    fn test_submit_requires_last_step() {
        let mut wizard = Wizard::resume(1, all_filled());
        assert_eq!(
            wizard.submit().unwrap_err(),
            WizardError::NotOnLastStep(Step::Services)
        );
        assert!(wizard.summary().is_none());
    }

    #[test]
    fn test_submit_produces_summary() {
        let mut wizard = Wizard::resume(2, all_filled());
        let summary = wizard.submit().unwrap();
        assert_eq!(summary.get("Full name"), Some("Ama Boateng"));
        assert!(wizard.summary().is_some());
    }

    #[test]
    fn test_submit_revalidates_earlier_steps() {
        // Contact is valid but basics were never checked
        let draft = ProDraft {
            phone: "+447911123456".to_owned(),
            ..ProDraft::default()
        };
        let mut wizard = Wizard::resume(2, draft);

        assert!(matches!(wizard.submit(), Err(WizardError::Invalid(_))));
        assert_eq!(wizard.step(), Step::Basics);
        assert_eq!(wizard.errors().get(Field::FullName), Some("Name is required"));
        assert!(wizard.summary().is_none());
    }

    #[test]
    fn test_submit_jumps_to_earliest_failing_step() {
        let mut draft = all_filled();
        draft.bio = String::new();
        draft.phone = String::new();
        let mut wizard = Wizard::resume(2, draft);

        assert_eq!(wizard.submit().unwrap_err(), WizardError::Invalid(2));
        assert_eq!(wizard.step(), Step::Services);
    }
}
