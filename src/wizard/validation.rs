use std::fmt;

use uuid::Uuid;

use crate::domain::{AnimalSubcategory, Category, Choice, DonationMode, DonationType, NewDonation};

use super::draft::{DonationDraft, PersonalInfo};
use super::step::Step;

/// User-correctable failure raised before anything leaves the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub title: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub(crate) fn required_fields(missing: &[&str]) -> Self {
        let mut message = String::from("Please fill in all required fields marked with *");
        if !missing.is_empty() {
            message.push_str(&format!(" (missing: {})", missing.join(", ")));
        }
        Self::new("Required fields missing", message)
    }

    pub(crate) fn selection_required() -> Self {
        Self::new("Selection required", "Please make a selection to continue")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Gate for the "Next" action on `step`.
pub fn validate_step(step: Step, draft: &DonationDraft) -> Result<(), ValidationError> {
    let selected = match step {
        Step::PersonalInfo => {
            let missing = draft.personal.missing_fields();
            if missing.is_empty() {
                return Ok(());
            }
            let labels: Vec<&str> = missing.iter().map(|field| field.label()).collect();
            return Err(ValidationError::required_fields(&labels));
        }
        Step::Category => draft.category.is_some(),
        // Reachable with another category only by stepping back; nothing to pick then.
        Step::AnimalType => !draft.is_animal_welfare() || draft.subcategory.is_some(),
        Step::DonationType => draft.donation_type.is_some(),
        Step::DonationMode => draft.donation_mode.is_some(),
        Step::Details => true,
    };
    if selected {
        Ok(())
    } else {
        Err(ValidationError::selection_required())
    }
}

/// A draft that passed every submission check, with its fields resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDonation {
    pub personal: PersonalInfo,
    pub category: Category,
    pub subcategory: Option<AnimalSubcategory>,
    pub donation_type: DonationType,
    pub donation_mode: DonationMode,
    pub amount: Option<f64>,
    pub other_details: Option<String>,
    pub ngo_id: Uuid,
}

impl ValidatedDonation {
    /// Builds the persistence payload owned by `user_id`.
    pub fn into_payload(self, user_id: Uuid) -> NewDonation {
        let delivery_address = match self.donation_mode {
            DonationMode::Offline => Some(self.personal.delivery_address()),
            DonationMode::Online => None,
        };
        NewDonation {
            user_id,
            amount: self.amount,
            category: self.category,
            subcategory: self.subcategory,
            donation_type: self.donation_type,
            donation_mode: self.donation_mode,
            ngo_id: Some(self.ngo_id),
            other_details: self.other_details,
            delivery_address,
        }
    }
}

fn missing_donation_information() -> ValidationError {
    ValidationError::new(
        "Missing donation information",
        "Please complete all required donation fields",
    )
}

/// Final check run by the submission adapter. Nothing is persisted unless this passes.
pub fn validate_submission(draft: &DonationDraft) -> Result<ValidatedDonation, ValidationError> {
    if !draft.personal.is_complete() {
        return Err(ValidationError::new(
            "Missing personal information",
            "Please complete all required personal fields",
        ));
    }

    let category = draft.category.ok_or_else(missing_donation_information)?;
    let subcategory = match (category, draft.subcategory) {
        (Category::Animals, Some(sub)) => Some(sub),
        (Category::Animals, None) => {
            return Err(ValidationError::new(
                "Missing donation information",
                "Please choose an animal type",
            ))
        }
        (_, Some(_)) => return Err(missing_donation_information()),
        (_, None) => None,
    };
    let donation_type = draft.donation_type.ok_or_else(missing_donation_information)?;
    let ngo_id = draft.selected_ngo_id.ok_or_else(missing_donation_information)?;

    let donation_mode = if donation_type.is_monetary() {
        DonationMode::Online
    } else {
        draft.donation_mode.ok_or_else(missing_donation_information)?
    };

    let amount = if donation_type.is_monetary() {
        match draft.amount {
            Some(value) if value.is_finite() && value > 0.0 => Some(value),
            _ => {
                return Err(ValidationError::new(
                    "Invalid amount",
                    "Please enter a valid donation amount",
                ))
            }
        }
    } else {
        None
    };

    let details = draft.other_details.trim();
    if donation_type == DonationType::Other && details.is_empty() {
        return Err(ValidationError::new(
            "Missing details",
            "Please describe what you would like to donate",
        ));
    }
    let other_details = (!details.is_empty()).then(|| details.to_string());

    Ok(ValidatedDonation {
        personal: draft.personal.clone(),
        category,
        subcategory,
        donation_type,
        donation_mode,
        amount,
        other_details,
        ngo_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::next_step;
    use chrono::NaiveDate;

    fn complete_personal() -> PersonalInfo {
        PersonalInfo {
            name: "A".into(),
            email: "a@x.com".into(),
            phone: "123".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1),
            address: "1 Main St".into(),
            city: "Pune".into(),
            state: "MH".into(),
            pin_code: "411001".into(),
        }
    }

    fn money_draft(amount: Option<f64>) -> DonationDraft {
        DonationDraft {
            personal: complete_personal(),
            category: Some(Category::Research),
            donation_type: Some(DonationType::Money),
            amount,
            selected_ngo_id: Some(Uuid::new_v4()),
            ..DonationDraft::default()
        }
    }

    #[test]
    fn personal_step_lists_missing_fields() {
        let draft = DonationDraft::default();
        let err = validate_step(Step::PersonalInfo, &draft).unwrap_err();
        assert_eq!(err.title, "Required fields missing");
        assert!(err.message.contains("Full Name"));
        assert!(err.message.contains("PIN Code"));
    }

    #[test]
    fn selection_steps_require_a_choice() {
        let draft = DonationDraft {
            category: Some(Category::Animals),
            ..DonationDraft::default()
        };
        for step in [
            Step::AnimalType,
            Step::DonationType,
            Step::DonationMode,
        ] {
            let err = validate_step(step, &draft).unwrap_err();
            assert_eq!(err.message, "Please make a selection to continue");
        }
        assert!(validate_step(Step::Category, &DonationDraft::default()).is_err());
        assert!(validate_step(Step::Details, &draft).is_ok());
    }

    #[test]
    fn animal_type_step_needs_nothing_for_other_categories() {
        let draft = DonationDraft {
            category: Some(Category::People),
            ..DonationDraft::default()
        };
        assert!(validate_step(Step::AnimalType, &draft).is_ok());
        assert_eq!(next_step(Step::AnimalType, &draft), Step::DonationType);
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        for amount in [None, Some(0.0), Some(-5.0), Some(f64::NAN)] {
            let err = validate_submission(&money_draft(amount)).unwrap_err();
            assert_eq!(err.title, "Invalid amount");
        }
        let ok = validate_submission(&money_draft(Some(25.0))).unwrap();
        assert_eq!(ok.amount, Some(25.0));
        assert_eq!(ok.donation_mode, DonationMode::Online);
    }

    #[test]
    fn money_forces_online_even_if_draft_says_offline() {
        let mut draft = money_draft(Some(10.0));
        draft.donation_mode = Some(DonationMode::Offline);
        let validated = validate_submission(&draft).unwrap();
        assert_eq!(validated.donation_mode, DonationMode::Online);
        assert_eq!(validated.into_payload(Uuid::new_v4()).delivery_address, None);
    }

    #[test]
    fn animal_category_needs_subcategory() {
        let mut draft = money_draft(Some(10.0));
        draft.category = Some(Category::Animals);
        let err = validate_submission(&draft).unwrap_err();
        assert_eq!(err.title, "Missing donation information");
        assert_eq!(err.message, "Please choose an animal type");
        draft.subcategory = Some(AnimalSubcategory::Birds);
        assert!(validate_submission(&draft).is_ok());
    }

    #[test]
    fn stale_subcategory_is_an_invalid_combination() {
        let mut draft = money_draft(Some(10.0));
        draft.subcategory = Some(AnimalSubcategory::Cats);
        assert!(validate_submission(&draft).is_err());
    }

    #[test]
    fn ngo_is_required() {
        let mut draft = money_draft(Some(10.0));
        draft.selected_ngo_id = None;
        let err = validate_submission(&draft).unwrap_err();
        assert_eq!(err.title, "Missing donation information");
    }

    #[test]
    fn other_type_requires_details() {
        let mut draft = DonationDraft {
            personal: complete_personal(),
            category: Some(Category::Rural),
            donation_type: Some(DonationType::Other),
            donation_mode: Some(DonationMode::Online),
            selected_ngo_id: Some(Uuid::new_v4()),
            ..DonationDraft::default()
        };
        assert_eq!(
            validate_submission(&draft).unwrap_err().title,
            "Missing details"
        );
        draft.other_details = "  Two bicycles  ".into();
        let validated = validate_submission(&draft).unwrap();
        assert_eq!(validated.other_details.as_deref(), Some("Two bicycles"));
        assert_eq!(validated.amount, None);
    }

    #[test]
    fn offline_payload_carries_delivery_address() {
        let draft = DonationDraft {
            personal: complete_personal(),
            category: Some(Category::People),
            donation_type: Some(DonationType::Food),
            donation_mode: Some(DonationMode::Offline),
            selected_ngo_id: Some(Uuid::new_v4()),
            ..DonationDraft::default()
        };
        let payload = validate_submission(&draft)
            .unwrap()
            .into_payload(Uuid::new_v4());
        assert_eq!(
            payload.delivery_address.as_deref(),
            Some("1 Main St, Pune, MH, 411001")
        );
        assert_eq!(payload.other_details, None);
        assert_eq!(payload.subcategory, None);
    }
}
