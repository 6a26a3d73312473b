//! Wizard steps.

use super::Field;

/// One page of the onboarding wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Step {
    /// Who you are and what you do.
    #[default]
    Basics,
    /// Experience, availability and rates.
    Services,
    /// How clients reach you.
    Contact,
}

impl Step {
    /// All steps in order.
    pub const ALL: [Self; 3] = [Self::Basics, Self::Services, Self::Contact];

    /// The final step, the only one that can submit.
    pub const LAST: Self = Self::Contact;

    /// Zero-based position of the step.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Basics => 0,
            Self::Services => 1,
            Self::Contact => 2,
        }
    }

    /// Step at `index`, clamped into range.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Basics,
            1 => Self::Services,
            _ => Self::Contact,
        }
    }

    /// The step after this one, or this one if it is the last.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The step before this one, or this one if it is the first.
    #[must_use]
    pub const fn previous(self) -> Self {
        Self::from_index(self.index().saturating_sub(1))
    }

    /// Stable identifier used in markup.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Basics => "basics",
            Self::Services => "services",
            Self::Contact => "contact",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Basics => "Basics",
            Self::Services => "Services",
            Self::Contact => "Contact",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Basics => "Tell us who you are and what you do.",
            Self::Services => "Share your experience, availability, and rates.",
            Self::Contact => "How clients can reach you once verified.",
        }
    }

    /// Fields validated when leaving this step.
    #[must_use]
    pub const fn fields(self) -> &'static [Field] {
        match self {
            Self::Basics => &[
                Field::FullName,
                Field::Trade,
                Field::ServiceArea,
                Field::Postcode,
            ],
            Self::Services => &[
                Field::Experience,
                Field::Availability,
                Field::Rate,
                Field::RateType,
                Field::Bio,
            ],
            Self::Contact => &[Field::Phone, Field::Whatsapp],
        }
    }

    /// Whether this is the final step.
    #[must_use]
    pub const fn is_last(self) -> bool {
        matches!(self, Self::Contact)
    }

    /// The step on which `field` is edited.
    #[must_use]
    pub fn of(field: Field) -> Self {
        Self::ALL
            .into_iter()
            .find(|step| step.fields().contains(&field))
            .unwrap_or(Self::LAST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for step in Step::ALL {
            assert_eq!(Step::from_index(step.index()), step);
        }
    }

    #[test]
    fn test_from_index_clamps() {
        assert_eq!(Step::from_index(7), Step::Contact);
    }

    #[test]
    fn test_next_and_previous_saturate() {
        assert_eq!(Step::Basics.previous(), Step::Basics);
        assert_eq!(Step::Contact.next(), Step::Contact);
        assert_eq!(Step::Basics.next(), Step::Services);
        assert_eq!(Step::Contact.previous(), Step::Services);
    }

    #[test]
    fn test_every_field_belongs_to_one_step() {
        for field in Field::ALL {
            let owners = Step::ALL
                .iter()
                .filter(|step| step.fields().contains(&field))
                .count();
            assert_eq!(owners, 1, "{field:?}");
        }
    }

    #[test]
    fn test_of() {
        assert_eq!(Step::of(Field::Postcode), Step::Basics);
        assert_eq!(Step::of(Field::Bio), Step::Services);
        assert_eq!(Step::of(Field::Whatsapp), Step::Contact);
    }
}
