//! Read-only access to donations, campaigns and their totals.
use std::fmt::Debug;

use crate::{
    db_types::{Campaign, Donation, DonationSummary, OrderId},
    traits::{CampaignManagement, DonationStore, DonationStoreError},
};

pub struct DonationQueryApi<B> {
    db: B,
}

impl<B: Debug> Debug for DonationQueryApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DonationQueryApi ({:?})", self.db)
    }
}

impl<B> DonationQueryApi<B>
where B: DonationStore + CampaignManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn donation_by_id(&self, id: i64) -> Result<Option<Donation>, DonationStoreError> {
        self.db.fetch_donation(id).await
    }

    pub async fn donation_by_order_id(&self, order_id: &OrderId) -> Result<Option<Donation>, DonationStoreError> {
        self.db.fetch_donation_by_order_id(order_id).await
    }

    pub async fn donations_for_campaign(&self, campaign_id: i64) -> Result<Vec<Donation>, DonationStoreError> {
        self.db.fetch_donations_for_campaign(campaign_id).await
    }

    pub async fn donations_for_donor(&self, donor_id: i64) -> Result<Vec<Donation>, DonationStoreError> {
        self.db.fetch_donations_for_donor(donor_id).await
    }

    pub async fn campaign_by_id(&self, campaign_id: i64) -> Result<Option<Campaign>, DonationStoreError> {
        self.db.fetch_campaign(campaign_id).await
    }

    /// Count and value of confirmed donations across all campaigns.
    pub async fn summary(&self) -> Result<DonationSummary, DonationStoreError> {
        self.db.donation_summary(None).await
    }

    /// Count and value of confirmed donations for one campaign. Returns `None` if the campaign does not exist.
    pub async fn campaign_summary(&self, campaign_id: i64) -> Result<Option<DonationSummary>, DonationStoreError> {
        if self.db.fetch_campaign(campaign_id).await?.is_none() {
            return Ok(None);
        }
        self.db.donation_summary(Some(campaign_id)).await.map(Some)
    }
}
