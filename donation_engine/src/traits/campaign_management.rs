use donor_common::Rupiah;

use crate::{
    db_types::{Campaign, NewCampaign},
    traits::DonationStoreError,
};

/// Read access to campaigns, plus the single write the donation engine is allowed to make to them: adding a confirmed
/// donation to the collected total.
#[allow(async_fn_in_trait)]
pub trait CampaignManagement {
    async fn fetch_campaign(&self, campaign_id: i64) -> Result<Option<Campaign>, DonationStoreError>;

    /// Campaigns are created by the campaign service. This is here for seeding and tests.
    async fn insert_campaign(&self, campaign: NewCampaign) -> Result<Campaign, DonationStoreError>;

    /// Increments the collected total of the campaign by `amount` and returns the updated campaign.
    ///
    /// Returns [`DonationStoreError::CampaignNotFound`] if the campaign does not exist, and
    /// [`DonationStoreError::InvalidAmount`] if `amount` is not positive.
    async fn add_to_total(&self, campaign_id: i64, amount: Rupiah) -> Result<Campaign, DonationStoreError>;
}
