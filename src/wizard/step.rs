use std::fmt;

use super::draft::DonationDraft;

/// The six screens of the donation form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Step {
    #[default]
    PersonalInfo,
    Category,
    AnimalType,
    DonationType,
    DonationMode,
    Details,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::PersonalInfo,
        Step::Category,
        Step::AnimalType,
        Step::DonationType,
        Step::DonationMode,
        Step::Details,
    ];

    /// One-based position shown to the user.
    pub fn index(&self) -> u8 {
        match self {
            Step::PersonalInfo => 1,
            Step::Category => 2,
            Step::AnimalType => 3,
            Step::DonationType => 4,
            Step::DonationMode => 5,
            Step::Details => 6,
        }
    }

    pub fn from_index(index: u8) -> Option<Step> {
        Step::ALL.iter().copied().find(|step| step.index() == index)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::PersonalInfo => "Personal Info",
            Step::Category => "Category",
            Step::AnimalType => "Animal Type",
            Step::DonationType => "Donation Type",
            Step::DonationMode => "Donation Mode",
            Step::Details => "Details",
        }
    }

    pub fn is_last(&self) -> bool {
        *self == Step::Details
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {} of 6: {}", self.index(), self.title())
    }
}

/// Where "Next" leads from `step` given the current selections.
///
/// Total over every step: the branch only looks at the selection made on the
/// step being left, and the final step maps to itself.
pub fn next_step(step: Step, draft: &DonationDraft) -> Step {
    match step {
        Step::PersonalInfo => Step::Category,
        Step::Category if draft.is_animal_welfare() => Step::AnimalType,
        Step::Category => Step::DonationType,
        Step::AnimalType => Step::DonationType,
        Step::DonationType if draft.is_monetary() => Step::Details,
        Step::DonationType => Step::DonationMode,
        Step::DonationMode => Step::Details,
        Step::Details => Step::Details,
    }
}

/// "Back" decrements by one without validation and never goes below the first step.
pub fn previous_step(step: Step) -> Step {
    step.index()
        .checked_sub(1)
        .and_then(Step::from_index)
        .unwrap_or(Step::PersonalInfo)
}
