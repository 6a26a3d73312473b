//! Wizard draft values and per-field validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Trades a pro can list under.
pub const TRADES: [&str; 8] = [
    "Plumber",
    "Electrician",
    "Driver / Instructor",
    "Barber",
    "Makeup Artist",
    "Cleaner",
    "Handyman",
    "Catering",
];

/// How the starting rate is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RateType {
    #[default]
    Hourly,
    Fixed,
}

impl RateType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Fixed => "fixed",
        }
    }

    /// Suffix used in the summary, e.g. "£40 per hour".
    #[must_use]
    pub const fn summary_suffix(self) -> &'static str {
        match self {
            Self::Hourly => "per hour",
            Self::Fixed => "fixed",
        }
    }
}

/// An editable wizard field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FullName,
    Trade,
    ServiceArea,
    Postcode,
    Experience,
    Availability,
    Rate,
    RateType,
    Bio,
    Phone,
    Whatsapp,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Self; 11] = [
        Self::FullName,
        Self::Trade,
        Self::ServiceArea,
        Self::Postcode,
        Self::Experience,
        Self::Availability,
        Self::Rate,
        Self::RateType,
        Self::Bio,
        Self::Phone,
        Self::Whatsapp,
    ];

    /// Form input name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::Trade => "trade",
            Self::ServiceArea => "service_area",
            Self::Postcode => "postcode",
            Self::Experience => "experience",
            Self::Availability => "availability",
            Self::Rate => "rate",
            Self::RateType => "rate_type",
            Self::Bio => "bio",
            Self::Phone => "phone",
            Self::Whatsapp => "whatsapp",
        }
    }

    /// Look a field up by its form input name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Check this field's value in `draft`, returning the message to show
    /// next to the input when it fails.
    #[must_use]
    pub fn validate(self, draft: &ProDraft) -> Option<&'static str> {
        let required = |value: &str, message| value.trim().is_empty().then_some(message);

        match self {
            Self::FullName => required(&draft.full_name, "Name is required"),
            Self::Trade => {
                let trade = draft.trade.trim();
                (!TRADES.iter().any(|offered| *offered == trade)).then_some("Choose your trade")
            }
            Self::ServiceArea => required(&draft.service_area, "List your service area"),
            Self::Postcode => required(&draft.postcode, "Postcode helps clients find you"),
            Self::Experience => required(&draft.experience, "Add a short experience summary"),
            Self::Availability => {
                required(&draft.availability, "Let clients know when you work")
            }
            Self::Bio => required(&draft.bio, "Add a short intro"),
            Self::Phone => required(&draft.phone, "Phone number is required"),
            Self::Rate | Self::RateType | Self::Whatsapp => None,
        }
    }
}

/// Everything entered into the wizard so far.
///
/// Starts empty (hourly rate, phone hidden) and is rebuilt from the
/// submitted form on every request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProDraft {
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
    pub show_phone: bool,
}

impl ProDraft {
    /// Raw value of a text field, as it should be echoed back into the form.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::Trade => &self.trade,
            Field::ServiceArea => &self.service_area,
            Field::Postcode => &self.postcode,
            Field::Experience => &self.experience,
            Field::Availability => &self.availability,
            Field::Rate => &self.rate,
            Field::RateType => self.rate_type.as_str(),
            Field::Bio => &self.bio,
            Field::Phone => &self.phone,
            Field::Whatsapp => &self.whatsapp,
        }
    }

    /// Validate a set of fields.
    #[must_use]
    pub fn validate(&self, fields: &[Field]) -> FieldErrors {
        let errors = fields
            .iter()
            .filter_map(|&field| field.validate(self).map(|message| (field, message)))
            .collect();
        FieldErrors(errors)
    }
}

/// Validation messages keyed by field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    /// Failed fields in form order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }
}
