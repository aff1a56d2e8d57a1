pub mod auth_service;
pub mod donation_service;
pub mod ngo_service;
pub mod wallet;

pub use auth_service::{AuthContext, AuthEvent, SignUpRequest};
pub use donation_service::{DonationService, StatusFilter, SubmissionReceipt, TrackedDonation};
pub use ngo_service::{NgoQuery, NgoService};
pub use wallet::{ConfiguredWallet, WalletContext, WalletError, WalletProvider};

pub use crate::errors::{DonationError as ServiceError, DonationResult as ServiceResult};
