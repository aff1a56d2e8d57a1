//! Capability interfaces for the hosted persistence/auth collaborator, plus the
//! backends that satisfy them.

pub mod credentials;
pub mod json_backend;
pub mod memory;
pub mod seed;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Donation, DonationStatus, NewDonation, Ngo, TransactionId, User, UserMetadata};

pub use json_backend::JsonStore;
pub use memory::MemoryStore;

/// Failure reported by a backend. The message is surfaced to the user verbatim.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Storage(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Auth(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Donation records: create, query by transaction id, query by owner.
#[async_trait]
pub trait DonationStore: Send + Sync {
    /// Persists `payload`, assigning the id, transaction id and `pending` status.
    async fn create_donation(&self, payload: NewDonation) -> StoreResult<Donation>;

    async fn donation_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> StoreResult<Option<Donation>>;

    /// All donations owned by `user_id`, newest first.
    async fn donations_by_owner(&self, user_id: Uuid) -> StoreResult<Vec<Donation>>;

    /// Moves a donation forward through its lifecycle. Driven by operators, never the wizard.
    async fn advance_status(
        &self,
        transaction_id: &TransactionId,
        status: DonationStatus,
    ) -> StoreResult<Donation>;
}

#[async_trait]
pub trait NgoDirectory: Send + Sync {
    /// Every NGO, ordered by name.
    async fn list_ngos(&self) -> StoreResult<Vec<Ngo>>;
    async fn ngo(&self, id: Uuid) -> StoreResult<Option<Ngo>>;
    /// Inserts or replaces by name.
    async fn upsert_ngo(&self, ngo: Ngo) -> StoreResult<Ngo>;
}

/// Session and account management delegated to the backend.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current_user(&self) -> StoreResult<Option<User>>;
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> StoreResult<User>;
    async fn sign_in(&self, email: &str, password: &str) -> StoreResult<User>;
    async fn sign_out(&self) -> StoreResult<()>;
}

/// The three capabilities bundled as shared trait objects.
#[derive(Clone)]
pub struct Backend {
    pub donations: Arc<dyn DonationStore>,
    pub ngos: Arc<dyn NgoDirectory>,
    pub auth: Arc<dyn AuthProvider>,
}

impl Backend {
    /// Uses one store for every capability.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: DonationStore + NgoDirectory + AuthProvider + 'static,
    {
        Self {
            donations: store.clone(),
            ngos: store.clone(),
            auth: store,
        }
    }
}
