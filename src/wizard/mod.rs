//! Donation wizard: step state, transition rules and the validation gate.
//!
//! Everything here is synchronous. Submission itself lives in
//! [`crate::core::services::DonationService`].

pub mod controller;
pub mod draft;
pub mod step;
pub mod validation;

pub use controller::DonationWizard;
pub use draft::{DonationDraft, PersonalField, PersonalInfo};
pub use step::{next_step, previous_step, Step};
pub use validation::{validate_step, validate_submission, ValidatedDonation, ValidationError};
