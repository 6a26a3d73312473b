//! Read-only summary shown after the wizard is submitted.

use serde::Serialize;

use super::ProDraft;

/// Shown in place of an empty value.
const EMPTY_PLACEHOLDER: &str = "—";

/// One labelled line of the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

impl SummaryRow {
    /// The value, or a dash when nothing was entered.
    #[must_use]
    pub fn display_value(&self) -> &str {
        if self.value.trim().is_empty() {
            EMPTY_PLACEHOLDER
        } else {
            &self.value
        }
    }
}

/// Snapshot of a submitted draft for the user to confirm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftSummary {
    pub rows: Vec<SummaryRow>,
}

impl DraftSummary {
    #[must_use]
    pub fn from_draft(draft: &ProDraft) -> Self {
        let rate = if draft.rate.trim().is_empty() {
            "N/A"
        } else {
            draft.rate.trim()
        };

        let row = |label, value: String| SummaryRow { label, value };

        Self {
            rows: vec![
                row("Full name", draft.full_name.clone()),
                row("Trade", draft.trade.clone()),
                row(
                    "Service area",
                    format!("{} ({})", draft.service_area, draft.postcode),
                ),
                row("Experience", draft.experience.clone()),
                row("Availability", draft.availability.clone()),
                row(
                    "Rate",
                    format!("{rate} {}", draft.rate_type.summary_suffix()),
                ),
                row("Bio", draft.bio.clone()),
                row("Phone", draft.phone.clone()),
                row("WhatsApp", draft.whatsapp.clone()),
            ],
        }
    }

    /// Value of the row with `label`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::RateType;

    #[test]
    fn test_rate_formatting() {
        let mut draft = ProDraft {
            rate: "£40".to_owned(),
            ..ProDraft::default()
        };
        assert_eq!(
            DraftSummary::from_draft(&draft).get("Rate"),
            Some("£40 per hour")
        );

        draft.rate = String::new();
        draft.rate_type = RateType::Fixed;
        assert_eq!(DraftSummary::from_draft(&draft).get("Rate"), Some("N/A fixed"));
    }

    #[test]
    fn test_service_area_includes_postcode() {
        let draft = ProDraft {
            service_area: "Manchester".to_owned(),
            postcode: "M1".to_owned(),
            ..ProDraft::default()
        };
        assert_eq!(
            DraftSummary::from_draft(&draft).get("Service area"),
            Some("Manchester (M1)")
        );
    }

    #[test]
    fn test_empty_values_display_as_dash() {
        let summary = DraftSummary::from_draft(&ProDraft::default());
        let whatsapp = summary
            .rows
            .iter()
            .find(|row| row.label == "WhatsApp")
            .map(SummaryRow::display_value);
        assert_eq!(whatsapp, Some("—"));
    }

    #[test]
    fn test_row_order() {
        let labels: Vec<_> = DraftSummary::from_draft(&ProDraft::default())
            .rows
            .iter()
            .map(|row| row.label)
            .collect();
        assert_eq!(
            labels,
            [
                "Full name",
                "Trade",
                "Service area",
                "Experience",
                "Availability",
                "Rate",
                "Bio",
                "Phone",
                "WhatsApp"
            ]
        );
    }
}
