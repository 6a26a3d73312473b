//! "Become a pro" wizard route handlers.
//!
//! The wizard is stateless on the server: every POST carries the current
//! step index, the button pressed and the whole draft (fields off the
//! current step ride along as hidden inputs). The handler rebuilds the
//! wizard, applies the transition and renders the result.

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use ghanovia_core::ActionOutcome;
use ghanovia_core::onboarding::{
    DraftSummary, Field, ProDraft, RateType, Step, TRADES, Wizard, WizardError,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::Result;
use crate::filters;
use crate::middleware::{OptionalUser, take_flash};

// =============================================================================
// Form Types
// =============================================================================

/// Which wizard button was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    #[default]
    Next,
    Back,
    Submit,
}

/// Posted wizard state.
///
/// Fields are listed out rather than flattening [`ProDraft`] because
/// urlencoded forms cannot be deserialized through `serde(flatten)`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WizardForm {
    pub step: usize,
    pub intent: Intent,
    pub full_name: String,
    pub trade: String,
    pub service_area: String,
    pub postcode: String,
    pub experience: String,
    pub availability: String,
    pub rate: String,
    pub rate_type: RateType,
    pub bio: String,
    pub phone: String,
    pub whatsapp: String,
    /// Checkbox: present (any value) when ticked.
    pub show_phone: Option<String>,
}

impl WizardForm {
    fn into_wizard(self) -> (Wizard, Intent) {
        let draft = ProDraft {
            full_name: self.full_name,
            trade: self.trade,
            service_area: self.service_area,
            postcode: self.postcode,
            experience: self.experience,
            availability: self.availability,
            rate: self.rate,
            rate_type: self.rate_type,
            bio: self.bio,
            phone: self.phone,
            whatsapp: self.whatsapp,
            show_phone: self.show_phone.is_some(),
        };
        (Wizard::resume(self.step, draft), self.intent)
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Wizard page template.
#[derive(Template, WebTemplate)]
#[template(path = "become_pro.html")]
pub struct BecomeProTemplate {
    pub wizard: Wizard,
    pub outcome: ActionOutcome,
    pub signed_in: bool,
    pub trades: &'static [&'static str],
    pub steps: &'static [Step],
}

impl BecomeProTemplate {
    fn new(wizard: Wizard, outcome: ActionOutcome, signed_in: bool) -> Self {
        Self {
            wizard,
            outcome,
            signed_in,
            trades: &TRADES,
            steps: &Step::ALL,
        }
    }

    fn step(&self) -> Step {
        self.wizard.step()
    }

    fn draft(&self) -> &ProDraft {
        self.wizard.draft()
    }

    fn summary(&self) -> Option<&DraftSummary> {
        self.wizard.summary()
    }

    /// 1-based step number for display.
    fn step_number(&self) -> usize {
        self.step().index() + 1
    }

    fn step_count(&self) -> usize {
        self.steps.len()
    }

    fn progress_percent(&self) -> usize {
        self.step_number() * 100 / self.step_count()
    }

    fn is_first(&self) -> bool {
        self.step().index() == 0
    }

    fn is_last(&self) -> bool {
        self.step().is_last()
    }

    fn on_step(&self, id: &str) -> bool {
        self.step().id() == id
    }

    fn error(&self, name: &str) -> Option<&'static str> {
        Field::from_name(name).and_then(|field| self.wizard.errors().get(field))
    }

    fn value(&self, name: &str) -> &str {
        Field::from_name(name).map_or("", |field| self.draft().value(field))
    }

    fn trade_selected(&self, trade: &str) -> bool {
        self.draft().trade == trade
    }

    fn rate_type_is(&self, rate_type: &str) -> bool {
        self.draft().rate_type.as_str() == rate_type
    }

    /// Draft values for fields not shown on the current step.
    fn carried_fields(&self) -> Vec<(&'static str, &str)> {
        let visible = self.step().fields();
        Field::ALL
            .into_iter()
            .filter(|field| !visible.contains(field))
            .map(|field| (field.name(), self.draft().value(field)))
            .collect()
    }

    /// `show_phone` has no `Field`; it lives on the contact step.
    fn carries_show_phone(&self) -> bool {
        self.draft().show_phone && !self.on_step(Step::Contact.id())
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the wizard on its first step.
pub async fn show(OptionalUser(user): OptionalUser, session: Session) -> Result<BecomeProTemplate> {
    let outcome = take_flash(&session).await?;
    Ok(BecomeProTemplate::new(Wizard::new(), outcome, user.is_some()))
}

/// Apply one wizard transition.
pub async fn transition(
    OptionalUser(user): OptionalUser,
    Form(form): Form<WizardForm>,
) -> BecomeProTemplate {
    let (mut wizard, intent) = form.into_wizard();

    match intent {
        Intent::Next => {
            wizard.advance();
        }
        Intent::Back => wizard.retreat(),
        Intent::Submit => match wizard.submit() {
            Ok(_) => tracing::info!(trade = %wizard.draft().trade, "Pro draft submitted"),
            Err(WizardError::NotOnLastStep(step)) => {
                tracing::debug!(step = step.id(), "Submit before last step ignored");
            }
            Err(WizardError::Invalid(count)) => {
                tracing::debug!(count, step = wizard.step().id(), "Pro draft has invalid fields");
            }
        },
    }

    BecomeProTemplate::new(wizard, ActionOutcome::Idle, user.is_some())
}
