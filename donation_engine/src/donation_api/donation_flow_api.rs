use std::fmt::Debug;

use log::*;

use crate::{
    db_types::NewDonation,
    donation_api::{
        donation_objects::{transaction_request_for, CreatedDonation, DonationRequest},
        errors::DonationFlowError,
    },
    helpers::new_order_id,
    traits::{CampaignManagement, DonationStore, DonorDirectory, PaymentGateway},
};

/// `DonationFlowApi` creates donations and opens payment sessions for them with the payment gateway.
pub struct DonationFlowApi<B, G> {
    db: B,
    gateway: G,
}

impl<B, G> Debug for DonationFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DonationFlowApi")
    }
}

impl<B, G> DonationFlowApi<B, G> {
    pub fn new(db: B, gateway: G) -> Self {
        Self { db, gateway }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B, G> DonationFlowApi<B, G>
where
    B: DonationStore + CampaignManagement + DonorDirectory,
    G: PaymentGateway,
{
    /// Creates a donation and opens a payment session for it.
    ///
    /// The donation is stored as `pending` *before* the gateway is called. If the gateway call fails, the donation is
    /// moved to `failed` and kept, and [`DonationFlowError::PaymentInitiationFailed`] is returned.
    ///
    /// The target check is advisory: two donations racing past it can take a campaign over its target.
    pub async fn create_donation(&self, request: DonationRequest) -> Result<CreatedDonation, DonationFlowError> {
        let DonationRequest { amount, donor_id, campaign_id } = request;
        if !amount.is_positive() {
            debug!("🔄️💸️ Rejecting donation of {amount} to campaign #{campaign_id}");
            return Err(DonationFlowError::InvalidAmount(amount));
        }
        let campaign =
            self.db.fetch_campaign(campaign_id).await?.ok_or(DonationFlowError::CampaignNotFound(campaign_id))?;
        if campaign.has_reached_target() {
            info!(
                "🔄️💸️ Campaign #{campaign_id} has collected {} of its {} target. Not accepting donations.",
                campaign.total_collected, campaign.target_total
            );
            return Err(DonationFlowError::CampaignTargetReached(campaign_id));
        }
        let donor = self.db.fetch_donor_profile(donor_id).await?;
        if donor.is_none() {
            warn!("🔄️💸️ Donor #{donor_id} has no profile. Using placeholder contact details for the payment.");
        }
        let new_donation = NewDonation::new(new_order_id(campaign_id, donor_id), campaign_id, donor_id, amount);
        let donation = self.db.insert_donation(new_donation).await?;
        let order_id = donation.order_id.clone();
        debug!("🔄️💸️ Donation [{order_id}] of {amount} to campaign #{campaign_id} is pending");

        let tx_request = transaction_request_for(&donation, &campaign, donor.as_ref());
        match self.gateway.create_transaction(tx_request).await {
            Ok(session) => {
                let donation = self.db.attach_payment_session(&order_id, &session.redirect_url, &session.token).await?;
                info!("🔄️💸️ Payment session opened for donation [{order_id}]");
                Ok(CreatedDonation { donation, payment_url: session.redirect_url, token: session.token })
            },
            Err(reason) => {
                warn!("🔄️💸️ Could not open a payment session for donation [{order_id}]. {reason}");
                if let Err(e) = self.db.mark_donation_failed(&order_id).await {
                    error!("🔄️💸️ Donation [{order_id}] could not be marked as failed and is stuck in pending. {e}");
                }
                Err(DonationFlowError::PaymentInitiationFailed { order_id, reason })
            },
        }
    }
}
