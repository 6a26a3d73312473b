//! "Become a pro" onboarding wizard.
//!
//! A three-step form (basics, services, contact) where moving forward only
//! validates the fields of the current step and moving back never
//! validates anything. The draft is plain data: the web layer carries it in
//! the rendered form between requests, nothing here persists it.
//!
//! ```text
//!   Basics  --advance-->  Services  --advance-->  Contact --submit--> Summary
//!           <--retreat--            <--retreat--
//! ```

mod draft;
mod step;
mod summary;
mod wizard;

pub use draft::{Field, FieldErrors, ProDraft, RateType, TRADES};
pub use step::Step;
pub use summary::{DraftSummary, SummaryRow};
pub use wizard::{Wizard, WizardError};
