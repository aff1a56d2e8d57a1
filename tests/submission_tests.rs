mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{food_draft, money_draft, sample_ngo, signed_in_service, TX_PATTERN};
use donation_core::{
    core::services::DonationService,
    domain::{Donation, DonationMode, DonationStatus, NewDonation, TransactionId},
    errors::DonationError,
    storage::{Backend, DonationStore, MemoryStore, StoreResult},
    wizard::PersonalField,
};
use regex::Regex;
use tokio::sync::Notify;
use uuid::Uuid;

#[tokio::test]
async fn offline_food_donation_is_recorded_as_pending() {
    let (store, service, ngo) = signed_in_service();

    let receipt = service.submit(&food_draft(&ngo)).await.unwrap();

    let pattern = Regex::new(TX_PATTERN).unwrap();
    assert!(pattern.is_match(receipt.transaction_id.as_str()));
    assert_eq!(receipt.status, DonationStatus::Pending);
    assert_eq!(
        receipt.tracking_route,
        format!("/tracker?txid={}", receipt.transaction_id)
    );
    assert_eq!(store.create_calls(), 1);

    let tracked = service.track(receipt.transaction_id.as_str()).await.unwrap();
    assert_eq!(tracked.ngo_label(), "Annapurna Kitchens");
    assert_eq!(tracked.donation.amount_label("₹"), "In-kind donation");
    assert_eq!(
        tracked.donation.delivery_address.as_deref(),
        Some("4 Temple St, Mysuru, Karnataka, 570001")
    );
    assert_eq!(tracked.donation.other_details, None);
    assert_eq!(tracked.donation.subcategory, None);
}

#[tokio::test]
async fn unauthenticated_submission_redirects_and_creates_nothing() {
    let ngo = sample_ngo();
    let store = Arc::new(MemoryStore::new().with_ngos(vec![ngo.clone()]));
    let service = DonationService::new(&Backend::from_store(store.clone()));

    let err = service.submit(&food_draft(&ngo)).await.unwrap_err();

    assert!(matches!(err, DonationError::Unauthenticated));
    assert_eq!(err.redirect_path(), Some("/auth"));
    assert_eq!(store.create_calls(), 0);
    assert_eq!(store.donation_count(), 0);
}

#[tokio::test]
async fn non_positive_money_amounts_never_reach_the_store() {
    let (store, service, ngo) = signed_in_service();

    for amount in [0.0, -5.0] {
        let err = service.submit(&money_draft(&ngo, amount)).await.unwrap_err();
        match err {
            DonationError::Validation(validation) => {
                assert_eq!(validation.title, "Invalid amount");
                assert_eq!(validation.message, "Please enter a valid donation amount");
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }
    assert_eq!(store.create_calls(), 0);
}

#[tokio::test]
async fn money_donations_are_stored_online_without_address() {
    let (store, service, ngo) = signed_in_service();
    let mut draft = money_draft(&ngo, 250.0);
    draft.donation_mode = Some(DonationMode::Offline);

    let receipt = service.submit(&draft).await.unwrap();
    let stored = store
        .donation_by_transaction_id(&receipt.transaction_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stored.donation_mode, DonationMode::Online);
    assert_eq!(stored.delivery_address, None);
    assert_eq!(stored.amount_label("₹"), "₹250.00");
}

#[tokio::test]
async fn any_empty_personal_field_blocks_submission() {
    let (store, service, ngo) = signed_in_service();

    for field in [
        PersonalField::Name,
        PersonalField::Email,
        PersonalField::Phone,
        PersonalField::DateOfBirth,
        PersonalField::Address,
        PersonalField::City,
        PersonalField::State,
        PersonalField::PinCode,
    ] {
        let mut draft = food_draft(&ngo);
        let personal = &mut draft.personal;
        match field {
            PersonalField::Name => personal.name.clear(),
            PersonalField::Email => personal.email.clear(),
            PersonalField::Phone => personal.phone = "   ".into(),
            PersonalField::DateOfBirth => personal.date_of_birth = None,
            PersonalField::Address => personal.address.clear(),
            PersonalField::City => personal.city.clear(),
            PersonalField::State => personal.state.clear(),
            PersonalField::PinCode => personal.pin_code.clear(),
        }
        let err = service.submit(&draft).await.unwrap_err();
        assert!(err.is_validation(), "{field:?} should fail validation");
        assert_eq!(
            err.to_string(),
            "Missing personal information: Please complete all required personal fields"
        );
    }
    assert_eq!(store.create_calls(), 0);
}

#[tokio::test]
async fn store_failure_is_reported_verbatim_and_retry_succeeds() {
    let (store, service, ngo) = signed_in_service();
    let draft = food_draft(&ngo);
    store.fail_next_create("connection reset by peer");

    let err = service.submit(&draft).await.unwrap_err();
    assert!(matches!(err, DonationError::Persistence(_)));
    assert_eq!(err.to_string(), "connection reset by peer");
    assert!(!service.is_processing());

    service.submit(&draft).await.unwrap();
    assert_eq!(store.create_calls(), 2);
    assert_eq!(store.donation_count(), 1);
}

/// Holds every create call until the gate is opened.
struct GatedStore {
    inner: Arc<MemoryStore>,
    gate: Arc<Notify>,
}

#[async_trait]
impl DonationStore for GatedStore {
    async fn create_donation(&self, payload: NewDonation) -> StoreResult<Donation> {
        self.gate.notified().await;
        self.inner.create_donation(payload).await
    }

    async fn donation_by_transaction_id(
        &self,
        transaction_id: &TransactionId,
    ) -> StoreResult<Option<Donation>> {
        self.inner.donation_by_transaction_id(transaction_id).await
    }

    async fn donations_by_owner(&self, user_id: Uuid) -> StoreResult<Vec<Donation>> {
        self.inner.donations_by_owner(user_id).await
    }

    async fn advance_status(
        &self,
        transaction_id: &TransactionId,
        status: DonationStatus,
    ) -> StoreResult<Donation> {
        self.inner.advance_status(transaction_id, status).await
    }
}

#[tokio::test]
async fn second_submit_while_in_flight_is_refused() {
    let (store, _, ngo) = signed_in_service();
    let gate = Arc::new(Notify::new());
    let backend = Backend {
        donations: Arc::new(GatedStore {
            inner: store.clone(),
            gate: gate.clone(),
        }),
        ngos: store.clone(),
        auth: store.clone(),
    };
    let service = DonationService::new(&backend);
    let draft = food_draft(&ngo);

    let (first, second) = tokio::join!(service.submit(&draft), async {
        assert!(service.is_processing());
        let outcome = service.submit(&draft).await;
        gate.notify_one();
        outcome
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(DonationError::SubmissionInFlight)));
    assert_eq!(store.create_calls(), 1);
    assert!(!service.is_processing());
}
