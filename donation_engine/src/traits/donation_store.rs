use donor_common::Rupiah;
use thiserror::Error;

use crate::{
    db_types::{Donation, DonationSummary, NewDonation, OrderId},
    traits::data_objects::{StatusTransition, StatusUpdate},
};

#[derive(Debug, Clone, Error)]
pub enum DonationStoreError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("Cannot insert donation, since it already exists with order id {0}")]
    DonationAlreadyExists(OrderId),
    #[error("The requested donation {0} does not exist")]
    DonationNotFound(OrderId),
    #[error("The requested donation (internal id {0}) does not exist")]
    DonationIdNotFound(i64),
    #[error("The requested campaign {0} does not exist")]
    CampaignNotFound(i64),
    #[error("Invalid amount: {0}. Amounts must be positive")]
    InvalidAmount(Rupiah),
}

impl From<sqlx::Error> for DonationStoreError {
    fn from(e: sqlx::Error) -> Self {
        DonationStoreError::DatabaseError(e.to_string())
    }
}

/// The `DonationStore` trait defines the persistence behaviour for donation attempts.
///
/// Backends must guarantee that [`DonationStore::apply_status_update`] is a single atomic unit of work: the status
/// compare-and-set on the donation and the increment of the owning campaign's collected total either both happen or
/// neither does.
#[allow(async_fn_in_trait)]
pub trait DonationStore: Clone {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Stores a new donation in `pending` status. If the order id is already taken,
    /// [`DonationStoreError::DonationAlreadyExists`] is returned and nothing is written.
    async fn insert_donation(&self, donation: NewDonation) -> Result<Donation, DonationStoreError>;

    /// Records the payment session returned by the gateway. Only sets the URL and token if they have not been set yet.
    async fn attach_payment_session(
        &self,
        order_id: &OrderId,
        payment_url: &str,
        token: &str,
    ) -> Result<Donation, DonationStoreError>;

    /// Moves a `pending` donation to `failed`. Used when the gateway could not open a payment session. A donation in
    /// any other status is returned unchanged.
    async fn mark_donation_failed(&self, order_id: &OrderId) -> Result<Donation, DonationStoreError>;

    /// Applies a gateway-reported status to the donation in a single transaction.
    ///
    /// * `success` and `failed` are final. Nothing moves a donation out of them.
    /// * `pending` and `unknown` move to any status.
    ///
    /// When the donation moves into `success` for the first time, the campaign's collected total is incremented by
    /// the donation amount in the same transaction, and the updated campaign is returned in the result. If the
    /// campaign no longer exists, the transaction is rolled back and [`DonationStoreError::CampaignNotFound`] is
    /// returned.
    ///
    /// The payment method label is recorded whether or not the status changes, but only if none has been recorded
    /// yet.
    async fn apply_status_update(
        &self,
        order_id: &OrderId,
        update: StatusUpdate,
    ) -> Result<StatusTransition, DonationStoreError>;

    async fn fetch_donation(&self, id: i64) -> Result<Option<Donation>, DonationStoreError>;

    async fn fetch_donation_by_order_id(&self, order_id: &OrderId) -> Result<Option<Donation>, DonationStoreError>;

    /// Donations for the campaign, newest first
    async fn fetch_donations_for_campaign(&self, campaign_id: i64) -> Result<Vec<Donation>, DonationStoreError>;

    /// Donations made by the donor, newest first
    async fn fetch_donations_for_donor(&self, donor_id: i64) -> Result<Vec<Donation>, DonationStoreError>;

    /// The number and value of `success` donations, either for a single campaign, or across all campaigns if
    /// `campaign_id` is `None`.
    async fn donation_summary(&self, campaign_id: Option<i64>) -> Result<DonationSummary, DonationStoreError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), DonationStoreError> {
        Ok(())
    }
}
