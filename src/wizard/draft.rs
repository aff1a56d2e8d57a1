use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{AnimalSubcategory, Category, Choice, DonationMode, DonationType};

/// Donor contact details collected on the first step. Every field is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pin_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonalField {
    Name,
    Email,
    Phone,
    DateOfBirth,
    Address,
    City,
    State,
    PinCode,
}

impl Choice for PersonalField {
    const KIND: &'static str = "field";

    fn all() -> &'static [Self] {
        &[
            PersonalField::Name,
            PersonalField::Email,
            PersonalField::Phone,
            PersonalField::DateOfBirth,
            PersonalField::Address,
            PersonalField::City,
            PersonalField::State,
            PersonalField::PinCode,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            PersonalField::Name => "name",
            PersonalField::Email => "email",
            PersonalField::Phone => "phone",
            PersonalField::DateOfBirth => "dob",
            PersonalField::Address => "address",
            PersonalField::City => "city",
            PersonalField::State => "state",
            PersonalField::PinCode => "pincode",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PersonalField::Name => "Full Name",
            PersonalField::Email => "Email",
            PersonalField::Phone => "Phone Number",
            PersonalField::DateOfBirth => "Date of Birth",
            PersonalField::Address => "Address",
            PersonalField::City => "City",
            PersonalField::State => "State",
            PersonalField::PinCode => "PIN Code",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            PersonalField::DateOfBirth => &["dateofbirth", "date", "birthday"],
            PersonalField::PinCode => &["pin", "pin-code", "zip"],
            _ => &[],
        }
    }
}

impl std::str::FromStr for PersonalField {
    type Err = crate::domain::ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::domain::parse_choice(s)
    }
}

impl PersonalInfo {
    pub fn is_filled(&self, field: PersonalField) -> bool {
        match field {
            PersonalField::DateOfBirth => self.date_of_birth.is_some(),
            other => !self.text(other).trim().is_empty(),
        }
    }

    pub fn missing_fields(&self) -> Vec<PersonalField> {
        PersonalField::all()
            .iter()
            .copied()
            .filter(|field| !self.is_filled(*field))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Current value rendered as text; the date uses `YYYY-MM-DD`.
    pub fn value(&self, field: PersonalField) -> String {
        match field {
            PersonalField::DateOfBirth => self
                .date_of_birth
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            other => self.text(other).to_string(),
        }
    }

    fn text(&self, field: PersonalField) -> &str {
        match field {
            PersonalField::Name => &self.name,
            PersonalField::Email => &self.email,
            PersonalField::Phone => &self.phone,
            PersonalField::Address => &self.address,
            PersonalField::City => &self.city,
            PersonalField::State => &self.state,
            PersonalField::PinCode => &self.pin_code,
            PersonalField::DateOfBirth => "",
        }
    }

    pub(crate) fn text_mut(&mut self, field: PersonalField) -> Option<&mut String> {
        match field {
            PersonalField::Name => Some(&mut self.name),
            PersonalField::Email => Some(&mut self.email),
            PersonalField::Phone => Some(&mut self.phone),
            PersonalField::Address => Some(&mut self.address),
            PersonalField::City => Some(&mut self.city),
            PersonalField::State => Some(&mut self.state),
            PersonalField::PinCode => Some(&mut self.pin_code),
            PersonalField::DateOfBirth => None,
        }
    }

    /// Single-line address used for offline drop-off or pickup.
    pub fn delivery_address(&self) -> String {
        format!(
            "{}, {}, {}, {}",
            self.address.trim(),
            self.city.trim(),
            self.state.trim(),
            self.pin_code.trim()
        )
    }
}

/// Transient state of a donation being composed. Lives only as long as the wizard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonationDraft {
    pub personal: PersonalInfo,
    pub category: Option<Category>,
    pub subcategory: Option<AnimalSubcategory>,
    pub donation_type: Option<DonationType>,
    pub donation_mode: Option<DonationMode>,
    pub amount: Option<f64>,
    pub other_details: String,
    pub selected_ngo_id: Option<Uuid>,
}

impl DonationDraft {
    pub fn is_monetary(&self) -> bool {
        self.donation_type.map(|kind| kind.is_monetary()).unwrap_or(false)
    }

    pub fn is_animal_welfare(&self) -> bool {
        self.category == Some(Category::Animals)
    }
}
