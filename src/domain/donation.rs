use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::common::{parse_choice, Choice, ParseChoiceError};

/// The cause a donor chooses to support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    People,
    Animals,
    Army,
    Research,
    Rural,
    Forestation,
    MentalHealth,
}

impl Choice for Category {
    const KIND: &'static str = "category";

    fn all() -> &'static [Self] {
        &[
            Category::People,
            Category::Animals,
            Category::Army,
            Category::Research,
            Category::Rural,
            Category::Forestation,
            Category::MentalHealth,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Category::People => "people",
            Category::Animals => "animals",
            Category::Army => "army",
            Category::Research => "research",
            Category::Rural => "rural",
            Category::Forestation => "forestation",
            Category::MentalHealth => "mentalHealth",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Category::People => "Needy People",
            Category::Animals => "Animals",
            Category::Army => "Army",
            Category::Research => "Research",
            Category::Rural => "Rural Development",
            Category::Forestation => "Forestation",
            Category::MentalHealth => "Mental Health",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Category::People => &["poor"],
            Category::MentalHealth => &["mental", "mental-health", "mental_health"],
            _ => &[],
        }
    }
}

/// Narrows an animal welfare donation to a particular group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimalSubcategory {
    Dogs,
    Cats,
    Wildlife,
    Birds,
    Marine,
    All,
}

impl Choice for AnimalSubcategory {
    const KIND: &'static str = "subcategory";

    fn all() -> &'static [Self] {
        &[
            AnimalSubcategory::Dogs,
            AnimalSubcategory::Cats,
            AnimalSubcategory::Wildlife,
            AnimalSubcategory::Birds,
            AnimalSubcategory::Marine,
            AnimalSubcategory::All,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            AnimalSubcategory::Dogs => "dogs",
            AnimalSubcategory::Cats => "cats",
            AnimalSubcategory::Wildlife => "wildlife",
            AnimalSubcategory::Birds => "birds",
            AnimalSubcategory::Marine => "marine",
            AnimalSubcategory::All => "all",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AnimalSubcategory::Dogs => "Dogs",
            AnimalSubcategory::Cats => "Cats",
            AnimalSubcategory::Wildlife => "Wildlife",
            AnimalSubcategory::Birds => "Birds",
            AnimalSubcategory::Marine => "Marine Life",
            AnimalSubcategory::All => "All Animals",
        }
    }
}

/// What is being given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DonationType {
    Money,
    Food,
    Clothes,
    Books,
    Teaching,
    Other,
}

impl DonationType {
    pub fn is_monetary(&self) -> bool {
        matches!(self, DonationType::Money)
    }
}

impl Choice for DonationType {
    const KIND: &'static str = "donation type";

    fn all() -> &'static [Self] {
        &[
            DonationType::Money,
            DonationType::Food,
            DonationType::Clothes,
            DonationType::Books,
            DonationType::Teaching,
            DonationType::Other,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            DonationType::Money => "money",
            DonationType::Food => "food",
            DonationType::Clothes => "clothes",
            DonationType::Books => "books",
            DonationType::Teaching => "teaching",
            DonationType::Other => "other",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DonationType::Money => "Money",
            DonationType::Food => "Food",
            DonationType::Clothes => "Clothes",
            DonationType::Books => "Books",
            DonationType::Teaching => "Teaching Time",
            DonationType::Other => "Other",
        }
    }
}

/// How an in-kind or monetary gift is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DonationMode {
    Online,
    Offline,
}

impl Choice for DonationMode {
    const KIND: &'static str = "donation mode";

    fn all() -> &'static [Self] {
        &[DonationMode::Online, DonationMode::Offline]
    }

    fn key(&self) -> &'static str {
        match self {
            DonationMode::Online => "online",
            DonationMode::Offline => "offline",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DonationMode::Online => "Online",
            DonationMode::Offline => "Offline (drop-off or pickup)",
        }
    }
}

/// Lifecycle of a persisted donation. Progress only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DonationStatus {
    Pending,
    Processing,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot move a donation from {from} back to {to}")]
pub struct StatusTransitionError {
    pub from: DonationStatus,
    pub to: DonationStatus,
}

impl DonationStatus {
    fn rank(&self) -> u8 {
        match self {
            DonationStatus::Pending => 0,
            DonationStatus::Processing => 1,
            DonationStatus::Completed => 2,
        }
    }

    /// Returns `next` when it does not regress. Staying put is allowed.
    pub fn advance_to(self, next: DonationStatus) -> Result<DonationStatus, StatusTransitionError> {
        if next.rank() < self.rank() {
            return Err(StatusTransitionError {
                from: self,
                to: next,
            });
        }
        Ok(next)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "⏳",
            DonationStatus::Processing => "⟳",
            DonationStatus::Completed => "✔",
        }
    }
}

impl Choice for DonationStatus {
    const KIND: &'static str = "status";

    fn all() -> &'static [Self] {
        &[
            DonationStatus::Pending,
            DonationStatus::Processing,
            DonationStatus::Completed,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Processing => "processing",
            DonationStatus::Completed => "completed",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "Pending",
            DonationStatus::Processing => "Processing",
            DonationStatus::Completed => "Completed",
        }
    }
}

macro_rules! choice_traits {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }

            impl FromStr for $ty {
                type Err = ParseChoiceError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    parse_choice(s)
                }
            }
        )+
    };
}

choice_traits!(
    Category,
    AnimalSubcategory,
    DonationType,
    DonationMode,
    DonationStatus
);

/// Public reference for a donation: `tx_` followed by 32 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub const PREFIX: &'static str = "tx_";

    pub fn generate() -> Self {
        Self(format!("{}{}", Self::PREFIX, Uuid::new_v4().simple()))
    }

    /// Wraps user input without checking its shape; lookups simply miss.
    pub fn from_input(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    pub fn is_well_formed(&self) -> bool {
        match self.0.strip_prefix(Self::PREFIX) {
            Some(rest) => {
                rest.len() == 32
                    && rest
                        .chars()
                        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
            }
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload handed to a donation store. Absent optional fields persist as null;
/// the store assigns the id, transaction id, timestamp and initial status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDonation {
    pub user_id: Uuid,
    pub amount: Option<f64>,
    pub category: Category,
    pub subcategory: Option<AnimalSubcategory>,
    pub donation_type: DonationType,
    pub donation_mode: DonationMode,
    pub ngo_id: Option<Uuid>,
    pub other_details: Option<String>,
    pub delivery_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub amount: Option<f64>,
    pub category: Category,
    #[serde(default)]
    pub subcategory: Option<AnimalSubcategory>,
    pub donation_type: DonationType,
    pub donation_mode: DonationMode,
    pub status: DonationStatus,
    pub transaction_id: TransactionId,
    #[serde(default)]
    pub ngo_id: Option<Uuid>,
    #[serde(default)]
    pub other_details: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub impact_report: Option<String>,
}

impl Donation {
    /// Materialises a freshly created record in the `pending` state.
    pub fn from_new(payload: NewDonation) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: payload.user_id,
            created_at: Utc::now(),
            amount: payload.amount,
            category: payload.category,
            subcategory: payload.subcategory,
            donation_type: payload.donation_type,
            donation_mode: payload.donation_mode,
            status: DonationStatus::Pending,
            transaction_id: TransactionId::generate(),
            ngo_id: payload.ngo_id,
            other_details: payload.other_details,
            delivery_address: payload.delivery_address,
            impact_report: None,
        }
    }

    /// `<symbol>x.xx` for monetary gifts, `In-kind donation` otherwise.
    pub fn amount_label(&self, currency_symbol: &str) -> String {
        match self.amount {
            Some(amount) => format!("{}{:.2}", currency_symbol, amount),
            None => "In-kind donation".to_string(),
        }
    }
}
