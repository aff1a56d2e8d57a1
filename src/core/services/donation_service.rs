use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::{
    parse_choice, Choice, Donation, DonationStatus, Ngo, ParseChoiceError, TransactionId,
};
use crate::errors::DonationError;
use crate::storage::{AuthProvider, Backend, DonationStore, NgoDirectory};
use crate::wizard::{validate_submission, DonationDraft, ValidationError};

use super::ServiceResult;

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub transaction_id: TransactionId,
    pub status: DonationStatus,
    /// Navigable tracking view, `/tracker?txid=<id>`.
    pub tracking_route: String,
}

impl SubmissionReceipt {
    fn for_donation(donation: &Donation) -> Self {
        Self {
            transaction_id: donation.transaction_id.clone(),
            status: donation.status,
            tracking_route: tracking_route(&donation.transaction_id),
        }
    }
}

pub fn tracking_route(transaction_id: &TransactionId) -> String {
    format!("/tracker?txid={}", transaction_id)
}

/// A donation found by the tracker together with its recipient, if recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedDonation {
    pub donation: Donation,
    pub ngo: Option<Ngo>,
}

impl TrackedDonation {
    pub fn ngo_label(&self) -> &str {
        self.ngo
            .as_ref()
            .map(|ngo| ngo.name.as_str())
            .unwrap_or("Not specified")
    }

    pub fn status_line(&self) -> String {
        format!(
            "{} {}",
            self.donation.status.icon(),
            self.donation.status.label()
        )
    }
}

/// Status filter used by the "my donations" view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(DonationStatus),
}

impl StatusFilter {
    pub fn matches(&self, donation: &Donation) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => donation.status == *status,
        }
    }

    pub fn empty_message(&self) -> String {
        match self {
            StatusFilter::All => "You haven't made any donations yet.".to_string(),
            StatusFilter::Only(status) => {
                format!("You don't have any {} donations yet.", status.key())
            }
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        parse_choice::<DonationStatus>(s).map(StatusFilter::Only)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => f.write_str(status.key()),
        }
    }
}

/// Resets the processing flag however the submission ends.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Submission adapter and donation lookups over the injected backend.
pub struct DonationService {
    donations: Arc<dyn DonationStore>,
    ngos: Arc<dyn NgoDirectory>,
    auth: Arc<dyn AuthProvider>,
    processing: AtomicBool,
}

impl DonationService {
    pub fn new(backend: &Backend) -> Self {
        Self {
            donations: backend.donations.clone(),
            ngos: backend.ngos.clone(),
            auth: backend.auth.clone(),
            processing: AtomicBool::new(false),
        }
    }

    /// True while a submission is awaiting the store.
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    /// Validates `draft`, packages it and hands it to the donation store.
    ///
    /// The session is checked first, then the fields. A second call while one is in
    /// flight fails with [`DonationError::SubmissionInFlight`] without reaching the
    /// store. Nothing is retried; the draft is left untouched for a manual retry.
    pub async fn submit(&self, draft: &DonationDraft) -> ServiceResult<SubmissionReceipt> {
        if self
            .processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("ignoring duplicate submission while one is in flight");
            return Err(DonationError::SubmissionInFlight);
        }
        let _guard = ProcessingGuard(&self.processing);

        let user = match self.auth.current_user().await? {
            Some(user) => user,
            None => {
                tracing::info!("submission rejected: no signed-in user");
                return Err(DonationError::Unauthenticated);
            }
        };

        let validated = validate_submission(draft).map_err(|err| {
            tracing::info!(reason = %err, "submission rejected by validation");
            err
        })?;

        let payload = validated.into_payload(user.id);
        tracing::info!(user = %user.id, category = ?payload.category, "submitting donation");
        let donation = self
            .donations
            .create_donation(payload)
            .await
            .map_err(|err| {
                tracing::error!("donation store rejected submission: {err}");
                err
            })?;

        tracing::info!(transaction_id = %donation.transaction_id, "donation recorded");
        Ok(SubmissionReceipt::for_donation(&donation))
    }

    /// Looks up a donation by the public transaction id typed by the user.
    pub async fn track(&self, input: &str) -> ServiceResult<TrackedDonation> {
        if input.trim().is_empty() {
            return Err(ValidationError::new(
                "Missing transaction ID",
                "Please enter a transaction ID",
            )
            .into());
        }
        let transaction_id = TransactionId::from_input(input);
        let donation = self
            .donations
            .donation_by_transaction_id(&transaction_id)
            .await?
            .ok_or_else(|| {
                DonationError::NotFound("No donation found with this transaction ID".into())
            })?;
        let ngo = match donation.ngo_id {
            Some(id) => self.ngos.ngo(id).await?,
            None => None,
        };
        Ok(TrackedDonation { donation, ngo })
    }

    /// The signed-in user's donations, newest first, narrowed by `filter`.
    pub async fn my_donations(&self, filter: StatusFilter) -> ServiceResult<Vec<TrackedDonation>> {
        let user = self
            .auth
            .current_user()
            .await?
            .ok_or(DonationError::Unauthenticated)?;
        let donations = self.donations.donations_by_owner(user.id).await?;
        let mut tracked = Vec::new();
        for donation in donations.into_iter().filter(|d| filter.matches(d)) {
            let ngo = match donation.ngo_id {
                Some(id) => self.ngos.ngo(id).await?,
                None => None,
            };
            tracked.push(TrackedDonation { donation, ngo });
        }
        Ok(tracked)
    }

    /// Operator-side lifecycle move; refuses to go backwards.
    pub async fn advance_status(
        &self,
        input: &str,
        status: DonationStatus,
    ) -> ServiceResult<Donation> {
        let transaction_id = TransactionId::from_input(input);
        let donation = self
            .donations
            .advance_status(&transaction_id, status)
            .await?;
        tracing::info!(transaction_id = %transaction_id, status = status.key(), "status advanced");
        Ok(donation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, DonationMode, DonationType, User, UserMetadata};
    use crate::storage::MemoryStore;
    use crate::wizard::PersonalInfo;
    use chrono::NaiveDate;

    fn food_draft(ngo: &Ngo) -> DonationDraft {
        DonationDraft {
            personal: PersonalInfo {
                name: "A".into(),
                email: "a@x.com".into(),
                phone: "123".into(),
                date_of_birth: NaiveDate::from_ymd_opt(1995, 3, 4),
                address: "7 Lake Rd".into(),
                city: "Kochi".into(),
                state: "KL".into(),
                pin_code: "682001".into(),
            },
            category: Some(Category::People),
            donation_type: Some(DonationType::Food),
            donation_mode: Some(DonationMode::Offline),
            selected_ngo_id: Some(ngo.id),
            ..DonationDraft::default()
        }
    }

    fn signed_in_service() -> (Arc<MemoryStore>, DonationService, Ngo) {
        let ngo = Ngo::new("Food Bank", "Meals for families").verified();
        let user = User::new("a@x.com", UserMetadata::default());
        let store = Arc::new(MemoryStore::signed_in(user).with_ngos(vec![ngo.clone()]));
        let service = DonationService::new(&Backend::from_store(store.clone()));
        (store, service, ngo)
    }

    #[tokio::test]
    async fn submission_returns_tracking_route() {
        let (store, service, ngo) = signed_in_service();
        let receipt = service.submit(&food_draft(&ngo)).await.unwrap();
        assert_eq!(receipt.status, DonationStatus::Pending);
        assert!(receipt.transaction_id.is_well_formed());
        assert_eq!(
            receipt.tracking_route,
            format!("/tracker?txid={}", receipt.transaction_id)
        );
        assert_eq!(store.create_calls(), 1);
        assert!(!service.is_processing());
    }

    #[tokio::test]
    async fn store_failures_are_shown_verbatim_and_release_the_flag() {
        let (store, service, ngo) = signed_in_service();
        store.fail_next_create("insert violates row-level security policy");
        let err = service.submit(&food_draft(&ngo)).await.unwrap_err();
        assert_eq!(err.to_string(), "insert violates row-level security policy");
        assert!(!service.is_processing());
        assert!(service.submit(&food_draft(&ngo)).await.is_ok());
    }

    #[tokio::test]
    async fn tracker_resolves_ngo_and_reports_missing_ids() {
        let (_store, service, ngo) = signed_in_service();
        let receipt = service.submit(&food_draft(&ngo)).await.unwrap();

        let tracked = service.track(receipt.transaction_id.as_str()).await.unwrap();
        assert_eq!(tracked.ngo_label(), "Food Bank");
        assert_eq!(tracked.donation.amount_label("₹"), "In-kind donation");
        assert_eq!(
            tracked.donation.delivery_address.as_deref(),
            Some("7 Lake Rd, Kochi, KL, 682001")
        );

        let blank = service.track("   ").await.unwrap_err();
        assert!(blank.to_string().contains("Please enter a transaction ID"));
        let missing = service.track("tx_unknown").await.unwrap_err();
        assert_eq!(
            missing.to_string(),
            "No donation found with this transaction ID"
        );
    }

    #[tokio::test]
    async fn my_donations_filters_by_status() {
        let (_store, service, ngo) = signed_in_service();
        let first = service.submit(&food_draft(&ngo)).await.unwrap();
        service.submit(&food_draft(&ngo)).await.unwrap();
        service
            .advance_status(first.transaction_id.as_str(), DonationStatus::Completed)
            .await
            .unwrap();

        let all = service.my_donations(StatusFilter::All).await.unwrap();
        assert_eq!(all.len(), 2);
        let completed = service
            .my_donations(StatusFilter::Only(DonationStatus::Completed))
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].donation.transaction_id, first.transaction_id);
        let processing = service
            .my_donations("processing".parse().unwrap())
            .await
            .unwrap();
        assert!(processing.is_empty());
    }

    #[tokio::test]
    async fn status_never_moves_backwards() {
        let (_store, service, ngo) = signed_in_service();
        let receipt = service.submit(&food_draft(&ngo)).await.unwrap();
        let id = receipt.transaction_id.as_str();
        service
            .advance_status(id, DonationStatus::Processing)
            .await
            .unwrap();
        assert!(service
            .advance_status(id, DonationStatus::Pending)
            .await
            .is_err());
    }

    #[test]
    fn filter_parsing_and_empty_states() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "Completed".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(DonationStatus::Completed)
        );
        assert!("refunded".parse::<StatusFilter>().is_err());
        assert_eq!(
            StatusFilter::All.empty_message(),
            "You haven't made any donations yet."
        );
        assert_eq!(
            StatusFilter::Only(DonationStatus::Pending).empty_message(),
            "You don't have any pending donations yet."
        );
    }
}
