use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Donation, DonationStatus, NewDonation, Ngo, TransactionId, User, UserMetadata};

use super::credentials::{hash_password, verify_password};
use super::{AuthProvider, DonationStore, NgoDirectory, StoreError, StoreResult};

#[derive(Debug, Default)]
struct MemoryState {
    donations: Vec<Donation>,
    ngos: Vec<Ngo>,
    accounts: Vec<Account>,
    session: Option<Uuid>,
    fail_next_create: Option<String>,
}

#[derive(Debug)]
struct Account {
    user: User,
    password_hash: Option<String>,
}

/// Process-local backend used by tests and demos. Counts create calls so
/// callers can assert that rejected submissions never reached the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    create_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose session already belongs to `user` (no password set).
    pub fn signed_in(user: User) -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.lock() {
            state.session = Some(user.id);
            state.accounts.push(Account {
                user,
                password_hash: None,
            });
        }
        store
    }

    pub fn with_ngos(self, ngos: Vec<Ngo>) -> Self {
        if let Ok(mut state) = self.lock() {
            state.ngos.extend(ngos);
        }
        self
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Makes the next `create_donation` fail with `message`.
    pub fn fail_next_create(&self, message: impl Into<String>) {
        if let Ok(mut state) = self.lock() {
            state.fail_next_create = Some(message.into());
        }
    }

    pub fn donation_count(&self) -> usize {
        self.lock().map(|state| state.donations.len()).unwrap_or(0)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Storage("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl DonationStore for MemoryStore {
    async fn create_donation(&self, payload: NewDonation) -> StoreResult<Donation> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock()?;
        if let Some(message) = state.fail_next_create.take() {
            return Err(StoreError::Storage(message));
        }
        let donation = Donation::from_new(payload);
        state.donations.push(donation.clone());
        Ok(donation)
    }

    async fn donation_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> StoreResult<Option<Donation>> {
        let state = self.lock()?;
        Ok(state
            .donations
            .iter()
            .find(|donation| &donation.transaction_id == transaction_id)
            .cloned())
    }

    async fn donations_by_owner(&self, user_id: Uuid) -> StoreResult<Vec<Donation>> {
        let state = self.lock()?;
        let mut owned: Vec<Donation> = state
            .donations
            .iter()
            .rev()
            .filter(|donation| donation.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn advance_status(
        &self,
        transaction_id: &TransactionId,
        status: DonationStatus,
    ) -> StoreResult<Donation> {
        let mut state = self.lock()?;
        let donation = state
            .donations
            .iter_mut()
            .find(|donation| &donation.transaction_id == transaction_id)
            .ok_or_else(|| {
                StoreError::NotFound("No donation found with this transaction ID".into())
            })?;
        donation.status = donation
            .status
            .advance_to(status)
            .map_err(|err| StoreError::Storage(err.to_string()))?;
        Ok(donation.clone())
    }
}

#[async_trait]
impl NgoDirectory for MemoryStore {
    async fn list_ngos(&self) -> StoreResult<Vec<Ngo>> {
        let mut ngos = self.lock()?.ngos.clone();
        ngos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ngos)
    }

    async fn ngo(&self, id: Uuid) -> StoreResult<Option<Ngo>> {
        Ok(self.lock()?.ngos.iter().find(|ngo| ngo.id == id).cloned())
    }

    async fn upsert_ngo(&self, ngo: Ngo) -> StoreResult<Ngo> {
        let mut state = self.lock()?;
        match state.ngos.iter_mut().find(|existing| existing.name == ngo.name) {
            Some(existing) => *existing = ngo.clone(),
            None => state.ngos.push(ngo.clone()),
        }
        Ok(ngo)
    }
}

#[async_trait]
impl AuthProvider for MemoryStore {
    async fn current_user(&self) -> StoreResult<Option<User>> {
        let state = self.lock()?;
        Ok(state.session.and_then(|id| {
            state
                .accounts
                .iter()
                .find(|account| account.user.id == id)
                .map(|account| account.user.clone())
        }))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> StoreResult<User> {
        let email = email.trim().to_lowercase();
        let password_hash = hash_password(password)?;
        let mut state = self.lock()?;
        if state
            .accounts
            .iter()
            .any(|account| account.user.email == email)
        {
            return Err(StoreError::Auth("User already registered".into()));
        }
        let user = User::new(email, metadata);
        state.accounts.push(Account {
            user: user.clone(),
            password_hash: Some(password_hash),
        });
        state.session = Some(user.id);
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> StoreResult<User> {
        let email = email.trim().to_lowercase();
        let mut state = self.lock()?;
        let user = state
            .accounts
            .iter()
            .find(|account| {
                account.user.email == email
                    && account
                        .password_hash
                        .as_deref()
                        .map(|hash| verify_password(password, hash))
                        .unwrap_or(false)
            })
            .map(|account| account.user.clone())
            .ok_or_else(|| StoreError::Auth("Invalid login credentials".into()))?;
        state.session = Some(user.id);
        Ok(user)
    }

    async fn sign_out(&self) -> StoreResult<()> {
        self.lock()?.session = None;
        Ok(())
    }
}
