#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use donation_core::{
    config::ConfigManager,
    core::services::DonationService,
    domain::{Category, DonationMode, DonationType, Ngo, User, UserMetadata},
    storage::{Backend, JsonStore, MemoryStore},
    wizard::{DonationDraft, PersonalInfo},
};
use tempfile::TempDir;

pub const TX_PATTERN: &str = "^tx_[0-9a-f]{32}$";

pub fn complete_personal() -> PersonalInfo {
    PersonalInfo {
        name: "A".into(),
        email: "a@x.com".into(),
        phone: "123".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1992, 8, 14),
        address: "4 Temple St".into(),
        city: "Mysuru".into(),
        state: "Karnataka".into(),
        pin_code: "570001".into(),
    }
}

/// Food donation delivered offline to `ngo`.
pub fn food_draft(ngo: &Ngo) -> DonationDraft {
    DonationDraft {
        personal: complete_personal(),
        category: Some(Category::People),
        donation_type: Some(DonationType::Food),
        donation_mode: Some(DonationMode::Offline),
        selected_ngo_id: Some(ngo.id),
        ..DonationDraft::default()
    }
}

pub fn money_draft(ngo: &Ngo, amount: f64) -> DonationDraft {
    DonationDraft {
        personal: complete_personal(),
        category: Some(Category::Research),
        donation_type: Some(DonationType::Money),
        donation_mode: Some(DonationMode::Online),
        amount: Some(amount),
        selected_ngo_id: Some(ngo.id),
        ..DonationDraft::default()
    }
}

pub fn sample_ngo() -> Ngo {
    Ngo::new("Annapurna Kitchens", "Cooked meals for families")
        .with_category("people")
        .verified()
}

/// A memory store with `a@x.com` signed in and one NGO registered.
pub fn signed_in_service() -> (Arc<MemoryStore>, DonationService, Ngo) {
    let ngo = sample_ngo();
    let user = User::new("a@x.com", UserMetadata::default());
    let store = Arc::new(MemoryStore::signed_in(user).with_ngos(vec![ngo.clone()]));
    let service = DonationService::new(&Backend::from_store(store.clone()));
    (store, service, ngo)
}

/// Json store and config manager rooted in a fresh temporary directory. Keep the
/// returned guard alive for the duration of the test.
pub fn setup_json_env() -> (TempDir, JsonStore, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    let store = JsonStore::new(Some(base.join("store"))).expect("open json store");
    let config_manager = ConfigManager::with_base_dir(base).expect("create config manager");
    (temp, store, config_manager)
}
