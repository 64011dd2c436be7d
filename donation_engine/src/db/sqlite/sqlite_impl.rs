//! `SqliteDatabase` is the SQLite implementation of the donation engine storage traits.
use std::fmt::Debug;

use donor_common::Rupiah;
use log::*;
use sqlx::SqlitePool;

use super::{campaigns, db_url, donations, donors, new_pool};
use crate::{
    db_types::{
        Campaign,
        Donation,
        DonationStatus,
        DonationSummary,
        DonorProfile,
        NewCampaign,
        NewDonation,
        NewDonor,
        OrderId,
    },
    traits::{CampaignManagement, DonationStore, DonationStoreError, DonorDirectory, StatusTransition, StatusUpdate},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl DonationStore for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_donation(&self, donation: NewDonation) -> Result<Donation, DonationStoreError> {
        let mut conn = self.pool.acquire().await?;
        donations::insert_donation(donation, &mut conn).await
    }

    async fn attach_payment_session(
        &self,
        order_id: &OrderId,
        payment_url: &str,
        token: &str,
    ) -> Result<Donation, DonationStoreError> {
        let mut conn = self.pool.acquire().await?;
        donations::attach_payment_session(order_id, payment_url, token, &mut conn)
            .await?
            .ok_or_else(|| DonationStoreError::DonationNotFound(order_id.clone()))
    }

    async fn mark_donation_failed(&self, order_id: &OrderId) -> Result<Donation, DonationStoreError> {
        let mut tx = self.pool.begin().await?;
        let donation = match donations::fail_pending_donation(order_id, &mut tx).await? {
            Some(d) => d,
            None => {
                let d = donations::fetch_donation_by_order_id(order_id, &mut tx)
                    .await?
                    .ok_or_else(|| DonationStoreError::DonationNotFound(order_id.clone()))?;
                warn!("🗃️ Donation [{order_id}] is {} and cannot be marked as failed", d.status);
                d
            },
        };
        tx.commit().await?;
        Ok(donation)
    }

    async fn apply_status_update(
        &self,
        order_id: &OrderId,
        update: StatusUpdate,
    ) -> Result<StatusTransition, DonationStoreError> {
        let mut tx = self.pool.begin().await?;
        // The first statement is a write, so the write lock is held from here until commit.
        let result = match donations::try_transition(order_id, &update, &mut tx).await? {
            Some(donation) if donation.status == DonationStatus::Success => {
                let campaign = campaigns::add_to_total(donation.campaign_id, donation.amount, &mut tx)
                    .await?
                    .ok_or(DonationStoreError::CampaignNotFound(donation.campaign_id))?;
                debug!("🗃️ Donation [{order_id}] confirmed. {} added to campaign #{}", donation.amount, campaign.id);
                StatusTransition::confirmed(donation, campaign)
            },
            Some(donation) => StatusTransition::changed(donation),
            None => {
                let donation = donations::record_provider_report(order_id, &update, &mut tx)
                    .await?
                    .ok_or_else(|| DonationStoreError::DonationNotFound(order_id.clone()))?;
                if donation.status == DonationStatus::Failed && update.status == DonationStatus::Success {
                    warn!(
                        "🗃️ Donation [{order_id}] is failed but the gateway now reports a payment ({}). The campaign \
                         total is unchanged. Refund or re-credit manually.",
                        update.provider_status.as_deref().unwrap_or("success")
                    );
                } else {
                    trace!("🗃️ Donation [{order_id}] stays {}. Reported status was {}", donation.status, update.status);
                }
                StatusTransition::unchanged(donation)
            },
        };
        tx.commit().await?;
        Ok(result)
    }

    async fn fetch_donation(&self, id: i64) -> Result<Option<Donation>, DonationStoreError> {
        let mut conn = self.pool.acquire().await?;
        let donation = donations::fetch_donation(id, &mut conn).await?;
        Ok(donation)
    }

    async fn fetch_donation_by_order_id(&self, order_id: &OrderId) -> Result<Option<Donation>, DonationStoreError> {
        let mut conn = self.pool.acquire().await?;
        let donation = donations::fetch_donation_by_order_id(order_id, &mut conn).await?;
        Ok(donation)
    }

    async fn fetch_donations_for_campaign(&self, campaign_id: i64) -> Result<Vec<Donation>, DonationStoreError> {
        let mut conn = self.pool.acquire().await?;
        let result = donations::fetch_donations_for_campaign(campaign_id, &mut conn).await?;
        Ok(result)
    }

    async fn fetch_donations_for_donor(&self, donor_id: i64) -> Result<Vec<Donation>, DonationStoreError> {
        let mut conn = self.pool.acquire().await?;
        let result = donations::fetch_donations_for_donor(donor_id, &mut conn).await?;
        Ok(result)
    }

    async fn donation_summary(&self, campaign_id: Option<i64>) -> Result<DonationSummary, DonationStoreError> {
        let mut conn = self.pool.acquire().await?;
        let summary = donations::donation_summary(campaign_id, &mut conn).await?;
        Ok(summary)
    }

    async fn close(&mut self) -> Result<(), DonationStoreError> {
        self.pool.close().await;
        Ok(())
    }
}

impl CampaignManagement for SqliteDatabase {
    async fn fetch_campaign(&self, campaign_id: i64) -> Result<Option<Campaign>, DonationStoreError> {
        let mut conn = self.pool.acquire().await?;
        let campaign = campaigns::fetch_campaign(campaign_id, &mut conn).await?;
        Ok(campaign)
    }

    async fn insert_campaign(&self, campaign: NewCampaign) -> Result<Campaign, DonationStoreError> {
        if !campaign.target_total.is_positive() {
            return Err(DonationStoreError::InvalidAmount(campaign.target_total));
        }
        let mut conn = self.pool.acquire().await?;
        let campaign = campaigns::insert_campaign(campaign, &mut conn).await?;
        Ok(campaign)
    }

    async fn add_to_total(&self, campaign_id: i64, amount: Rupiah) -> Result<Campaign, DonationStoreError> {
        if !amount.is_positive() {
            return Err(DonationStoreError::InvalidAmount(amount));
        }
        let mut conn = self.pool.acquire().await?;
        campaigns::add_to_total(campaign_id, amount, &mut conn)
            .await?
            .ok_or(DonationStoreError::CampaignNotFound(campaign_id))
    }
}

impl DonorDirectory for SqliteDatabase {
    async fn fetch_donor_profile(&self, donor_id: i64) -> Result<Option<DonorProfile>, DonationStoreError> {
        let mut conn = self.pool.acquire().await?;
        let donor = donors::fetch_donor(donor_id, &mut conn).await?;
        Ok(donor)
    }

    async fn insert_donor(&self, donor: NewDonor) -> Result<DonorProfile, DonationStoreError> {
        let mut conn = self.pool.acquire().await?;
        let donor = donors::insert_donor(donor, &mut conn).await?;
        Ok(donor)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date with the migrations embedded in this crate.
    pub async fn migrate(&self) -> Result<(), DonationStoreError> {
        sqlx::migrate!("./src/db/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DonationStoreError::DatabaseError(format!("Could not run migrations. {e}")))?;
        info!("🗃️ Database migrations are up to date");
        Ok(())
    }
}
