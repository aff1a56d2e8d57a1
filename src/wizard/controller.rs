use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{AnimalSubcategory, Category, DonationMode, DonationType, Ngo, User};

use super::draft::{DonationDraft, PersonalField};
use super::step::{next_step, previous_step, Step};
use super::validation::{validate_step, validate_submission, ValidatedDonation, ValidationError};

/// Step sequencer plus the draft it is filling in.
///
/// Selections may be changed from any step (the user can go back and revisit),
/// but every setter keeps fields that belong to skipped steps unset.
#[derive(Debug, Clone, Default)]
pub struct DonationWizard {
    step: Step,
    draft: DonationDraft,
}

impl DonationWizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a draft with the signed-in user's email filled in.
    pub fn for_user(user: &User) -> Self {
        let mut wizard = Self::new();
        wizard.draft.personal.email = user.email.clone();
        wizard
    }

    /// Preselects the first NGO by name, if any are available.
    pub fn preselect_ngo(&mut self, ngos: &[Ngo]) {
        if self.draft.selected_ngo_id.is_some() {
            return;
        }
        self.draft.selected_ngo_id = ngos
            .iter()
            .min_by(|a, b| a.name.cmp(&b.name))
            .map(|ngo| ngo.id);
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &DonationDraft {
        &self.draft
    }

    pub fn set_field(&mut self, field: PersonalField, value: &str) -> Result<(), ValidationError> {
        let value = value.trim();
        match self.draft.personal.text_mut(field) {
            Some(slot) => *slot = value.to_string(),
            None if value.is_empty() => self.draft.personal.date_of_birth = None,
            None => {
                let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                    ValidationError::new("Invalid date", "Enter the date as YYYY-MM-DD")
                })?;
                self.draft.personal.date_of_birth = Some(date);
            }
        }
        Ok(())
    }

    /// Picking Animals from a later step without an animal type returns to that step.
    pub fn select_category(&mut self, category: Category) {
        self.draft.category = Some(category);
        if category != Category::Animals {
            self.draft.subcategory = None;
        } else if self.draft.subcategory.is_none() && self.step > Step::AnimalType {
            self.step = Step::AnimalType;
        }
    }

    pub fn select_subcategory(
        &mut self,
        subcategory: AnimalSubcategory,
    ) -> Result<(), ValidationError> {
        if !self.draft.is_animal_welfare() {
            return Err(ValidationError::new(
                "Invalid selection",
                "Animal types apply only to the Animals category",
            ));
        }
        self.draft.subcategory = Some(subcategory);
        Ok(())
    }

    pub fn select_donation_type(&mut self, donation_type: DonationType) {
        let was_monetary = self.draft.is_monetary();
        self.draft.donation_type = Some(donation_type);
        if donation_type.is_monetary() {
            self.draft.donation_mode = Some(DonationMode::Online);
        } else {
            self.draft.amount = None;
            if was_monetary {
                self.draft.donation_mode = None;
            }
        }
    }

    pub fn select_mode(&mut self, mode: DonationMode) -> Result<(), ValidationError> {
        if self.draft.is_monetary() && mode != DonationMode::Online {
            return Err(ValidationError::new(
                "Invalid selection",
                "Money donations are always made online",
            ));
        }
        self.draft.donation_mode = Some(mode);
        Ok(())
    }

    /// Records the typed amount. Range checks happen at submission.
    pub fn set_amount(&mut self, input: &str) -> Result<(), ValidationError> {
        if !self.draft.is_monetary() {
            return Err(ValidationError::new(
                "Invalid selection",
                "An amount applies only to money donations",
            ));
        }
        let input = input.trim();
        if input.is_empty() {
            self.draft.amount = None;
            return Ok(());
        }
        let amount = input.parse::<f64>().map_err(|_| {
            ValidationError::new("Invalid amount", "Please enter a valid donation amount")
        })?;
        self.draft.amount = Some(amount);
        Ok(())
    }

    pub fn set_other_details(&mut self, details: &str) {
        self.draft.other_details = details.to_string();
    }

    pub fn select_ngo(&mut self, ngo_id: Uuid) {
        self.draft.selected_ngo_id = Some(ngo_id);
    }

    /// Validates the current step and moves forward. The step is unchanged on error.
    pub fn next(&mut self) -> Result<Step, ValidationError> {
        validate_step(self.step, &self.draft)?;
        self.step = next_step(self.step, &self.draft);
        Ok(self.step)
    }

    pub fn back(&mut self) -> Step {
        self.step = previous_step(self.step);
        self.step
    }

    pub fn validate(&self) -> Result<ValidatedDonation, ValidationError> {
        validate_submission(&self.draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserMetadata;

    fn wizard_at_category() -> DonationWizard {
        let mut wizard = DonationWizard::new();
        for (field, value) in [
            (PersonalField::Name, "A"),
            (PersonalField::Email, "a@x.com"),
            (PersonalField::Phone, "123"),
            (PersonalField::DateOfBirth, "1990-05-17"),
            (PersonalField::Address, "1 Main St"),
            (PersonalField::City, "Pune"),
            (PersonalField::State, "MH"),
            (PersonalField::PinCode, "411001"),
        ] {
            wizard.set_field(field, value).unwrap();
        }
        assert_eq!(wizard.next().unwrap(), Step::Category);
        wizard
    }

    #[test]
    fn failed_validation_keeps_the_step() {
        let mut wizard = DonationWizard::new();
        assert!(wizard.next().is_err());
        assert_eq!(wizard.step(), Step::PersonalInfo);
    }

    #[test]
    fn rejects_malformed_dates() {
        let mut wizard = DonationWizard::new();
        let err = wizard
            .set_field(PersonalField::DateOfBirth, "17/05/1990")
            .unwrap_err();
        assert_eq!(err.title, "Invalid date");
        assert!(wizard.draft().personal.date_of_birth.is_none());
    }

    #[test]
    fn switching_away_from_animals_clears_subcategory() {
        let mut wizard = wizard_at_category();
        wizard.select_category(Category::Animals);
        wizard.select_subcategory(AnimalSubcategory::Dogs).unwrap();
        wizard.select_category(Category::Army);
        assert_eq!(wizard.draft().subcategory, None);
        assert_eq!(wizard.next().unwrap(), Step::DonationType);
    }

    #[test]
    fn subcategory_requires_animals() {
        let mut wizard = wizard_at_category();
        wizard.select_category(Category::People);
        assert!(wizard.select_subcategory(AnimalSubcategory::Cats).is_err());
    }

    #[test]
    fn money_locks_mode_to_online() {
        let mut wizard = wizard_at_category();
        wizard.select_category(Category::Forestation);
        wizard.next().unwrap();
        wizard.select_donation_type(DonationType::Money);
        assert_eq!(wizard.draft().donation_mode, Some(DonationMode::Online));
        assert!(wizard.select_mode(DonationMode::Offline).is_err());
        assert_eq!(wizard.next().unwrap(), Step::Details);
    }

    #[test]
    fn leaving_money_resets_forced_fields() {
        let mut wizard = wizard_at_category();
        wizard.select_donation_type(DonationType::Money);
        wizard.set_amount("40").unwrap();
        wizard.select_donation_type(DonationType::Books);
        assert_eq!(wizard.draft().amount, None);
        assert_eq!(wizard.draft().donation_mode, None);
        assert!(wizard.set_amount("10").is_err());
    }

    #[test]
    fn back_keeps_entered_values() {
        let mut wizard = wizard_at_category();
        wizard.select_category(Category::Animals);
        wizard.next().unwrap();
        assert_eq!(wizard.back(), Step::Category);
        assert_eq!(wizard.back(), Step::PersonalInfo);
        assert_eq!(wizard.back(), Step::PersonalInfo);
        assert_eq!(wizard.draft().category, Some(Category::Animals));
        assert_eq!(wizard.draft().personal.city, "Pune");
    }

    #[test]
    fn stepping_back_onto_animal_type_with_other_category_moves_on() {
        let mut wizard = wizard_at_category();
        wizard.select_category(Category::People);
        assert_eq!(wizard.next().unwrap(), Step::DonationType);
        wizard.select_donation_type(DonationType::Food);
        assert_eq!(wizard.back(), Step::AnimalType);
        assert_eq!(wizard.next().unwrap(), Step::DonationType);
        assert_eq!(wizard.draft().subcategory, None);
        assert_eq!(wizard.draft().donation_type, Some(DonationType::Food));
    }

    #[test]
    fn choosing_animals_late_returns_to_animal_type() {
        let mut wizard = wizard_at_category();
        wizard.select_category(Category::Research);
        wizard.next().unwrap();
        wizard.select_donation_type(DonationType::Money);
        assert_eq!(wizard.next().unwrap(), Step::Details);

        wizard.select_category(Category::Animals);
        assert_eq!(wizard.step(), Step::AnimalType);
        assert!(wizard.next().is_err());
        wizard.select_subcategory(AnimalSubcategory::Wildlife).unwrap();
        assert_eq!(wizard.next().unwrap(), Step::DonationType);
    }

    #[test]
    fn prefill_uses_session_email_and_first_ngo_by_name() {
        let user = User::new("donor@example.com", UserMetadata::default());
        let mut wizard = DonationWizard::for_user(&user);
        let zeta = Ngo::new("Zeta Trust", "");
        let alpha = Ngo::new("Alpha Aid", "");
        wizard.preselect_ngo(&[zeta, alpha.clone()]);
        assert_eq!(wizard.draft().personal.email, "donor@example.com");
        assert_eq!(wizard.draft().selected_ngo_id, Some(alpha.id));
    }
}
