use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{Donation, DonationStatus, NewDonation, Ngo, TransactionId, User, UserMetadata},
    utils::{
        paths,
        persistence::{read_json_optional, write_json_atomic},
    },
};

use super::credentials::{hash_password, verify_password};
use super::{AuthProvider, DonationStore, NgoDirectory, StoreError, StoreResult};

const DONATIONS_FILE: &str = "donations.json";
const NGOS_FILE: &str = "ngos.json";
const USERS_FILE: &str = "users.json";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAccount {
    user: User,
    password_hash: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionState {
    #[serde(default)]
    user_id: Option<Uuid>,
}

/// Filesystem backend: one pretty-printed JSON document per collection under
/// `root`. Every write stages to a temporary file and renames it into place.
pub struct JsonStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Opens (creating if needed) a store under `root`, or the default data
    /// directory when `None`.
    pub fn new(root: Option<PathBuf>) -> StoreResult<Self> {
        let root = root.unwrap_or_else(paths::store_dir);
        std::fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "opened json store");
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn new_default() -> StoreResult<Self> {
        Self::new(None)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    fn guard(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Storage("json store lock poisoned".into()))
    }

    fn read_list<T: serde::de::DeserializeOwned>(&self, file: &str) -> StoreResult<Vec<T>> {
        Ok(read_json_optional::<Vec<T>, StoreError>(&self.path(file))?.unwrap_or_default())
    }

    fn write_list<T: Serialize>(&self, file: &str, items: &[T]) -> StoreResult<()> {
        write_json_atomic::<_, StoreError>(items, &self.path(file))
    }

    fn read_session(&self) -> StoreResult<SessionState> {
        Ok(read_json_optional::<SessionState, StoreError>(&self.path(SESSION_FILE))?
            .unwrap_or_default())
    }

    fn write_session(&self, user_id: Option<Uuid>) -> StoreResult<()> {
        write_json_atomic::<_, StoreError>(&SessionState { user_id }, &self.path(SESSION_FILE))
    }
}

#[async_trait]
impl DonationStore for JsonStore {
    async fn create_donation(&self, payload: NewDonation) -> StoreResult<Donation> {
        let _guard = self.guard()?;
        let mut donations: Vec<Donation> = self.read_list(DONATIONS_FILE)?;
        let donation = Donation::from_new(payload);
        donations.push(donation.clone());
        self.write_list(DONATIONS_FILE, &donations)?;
        Ok(donation)
    }

    async fn donation_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> StoreResult<Option<Donation>> {
        let donations: Vec<Donation> = self.read_list(DONATIONS_FILE)?;
        Ok(donations
            .into_iter()
            .find(|donation| &donation.transaction_id == transaction_id))
    }

    async fn donations_by_owner(&self, user_id: Uuid) -> StoreResult<Vec<Donation>> {
        let donations: Vec<Donation> = self.read_list(DONATIONS_FILE)?;
        let mut owned: Vec<Donation> = donations
            .into_iter()
            .rev()
            .filter(|donation| donation.user_id == user_id)
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn advance_status(
        &self,
        transaction_id: &TransactionId,
        status: DonationStatus,
    ) -> StoreResult<Donation> {
        let _guard = self.guard()?;
        let mut donations: Vec<Donation> = self.read_list(DONATIONS_FILE)?;
        let donation = donations
            .iter_mut()
            .find(|donation| &donation.transaction_id == transaction_id)
            .ok_or_else(|| {
                StoreError::NotFound("No donation found with this transaction ID".into())
            })?;
        donation.status = donation
            .status
            .advance_to(status)
            .map_err(|err| StoreError::Storage(err.to_string()))?;
        let updated = donation.clone();
        self.write_list(DONATIONS_FILE, &donations)?;
        Ok(updated)
    }
}

#[async_trait]
impl NgoDirectory for JsonStore {
    async fn list_ngos(&self) -> StoreResult<Vec<Ngo>> {
        let mut ngos: Vec<Ngo> = self.read_list(NGOS_FILE)?;
        ngos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ngos)
    }

    async fn ngo(&self, id: Uuid) -> StoreResult<Option<Ngo>> {
        let ngos: Vec<Ngo> = self.read_list(NGOS_FILE)?;
        Ok(ngos.into_iter().find(|ngo| ngo.id == id))
    }

    async fn upsert_ngo(&self, ngo: Ngo) -> StoreResult<Ngo> {
        let _guard = self.guard()?;
        let mut ngos: Vec<Ngo> = self.read_list(NGOS_FILE)?;
        match ngos.iter_mut().find(|existing| existing.name == ngo.name) {
            Some(existing) => *existing = ngo.clone(),
            None => ngos.push(ngo.clone()),
        }
        self.write_list(NGOS_FILE, &ngos)?;
        Ok(ngo)
    }
}

#[async_trait]
impl AuthProvider for JsonStore {
    async fn current_user(&self) -> StoreResult<Option<User>> {
        let Some(user_id) = self.read_session()?.user_id else {
            return Ok(None);
        };
        let accounts: Vec<StoredAccount> = self.read_list(USERS_FILE)?;
        Ok(accounts
            .into_iter()
            .find(|account| account.user.id == user_id)
            .map(|account| account.user))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> StoreResult<User> {
        let email = email.trim().to_lowercase();
        let password_hash = hash_password(password)?;
        let _guard = self.guard()?;
        let mut accounts: Vec<StoredAccount> = self.read_list(USERS_FILE)?;
        if accounts.iter().any(|account| account.user.email == email) {
            return Err(StoreError::Auth("User already registered".into()));
        }
        let user = User::new(email, metadata);
        accounts.push(StoredAccount {
            user: user.clone(),
            password_hash,
        });
        self.write_list(USERS_FILE, &accounts)?;
        self.write_session(Some(user.id))?;
        tracing::info!(user = %user.id, "account created");
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> StoreResult<User> {
        let email = email.trim().to_lowercase();
        let accounts: Vec<StoredAccount> = self.read_list(USERS_FILE)?;
        let user = accounts
            .into_iter()
            .find(|account| {
                account.user.email == email && verify_password(password, &account.password_hash)
            })
            .map(|account| account.user)
            .ok_or_else(|| StoreError::Auth("Invalid login credentials".into()))?;
        let _guard = self.guard()?;
        self.write_session(Some(user.id))?;
        Ok(user)
    }

    async fn sign_out(&self) -> StoreResult<()> {
        let _guard = self.guard()?;
        self.write_session(None)
    }
}
