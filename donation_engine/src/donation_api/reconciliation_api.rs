use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{DonationStatus, OrderId},
    donation_api::{
        donation_objects::ReconciliationOutcome,
        errors::ReconciliationError,
        notification_objects::PaymentNotification,
    },
    events::EventProducers,
    traits::{
        DonationStore,
        DonationStoreError,
        PaymentGateway,
        StatusTransition,
        StatusUpdate,
        TransactionStatusReport,
    },
};

/// `ReconciliationApi` brings donations in line with what the payment gateway reports about them, whether the report
/// arrives as a notification or is fetched on demand.
///
/// Every report goes through the same path: the provider status is mapped to a [`DonationStatus`], and the backend
/// applies it in a single atomic unit of work that also credits the campaign total on the first transition into
/// `success`. Duplicate and out-of-order reports are therefore harmless.
pub struct ReconciliationApi<B, G> {
    db: B,
    gateway: G,
    producers: EventProducers,
}

impl<B, G> Debug for ReconciliationApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconciliationApi")
    }
}

impl<B, G> ReconciliationApi<B, G> {
    pub fn new(db: B, gateway: G, producers: EventProducers) -> Self {
        Self { db, gateway, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B, G> ReconciliationApi<B, G>
where
    B: DonationStore,
    G: PaymentGateway,
{
    /// Handles an asynchronous payment notification from the gateway.
    pub async fn handle_notification(
        &self,
        notification: PaymentNotification,
    ) -> Result<ReconciliationOutcome, ReconciliationError> {
        let order_id = notification.order_id().ok_or_else(|| {
            debug!("🔄️🔔️ Ignoring a notification without an order id");
            ReconciliationError::MissingOrderId
        })?;
        trace!(
            "🔄️🔔️ Notification for [{order_id}]: {:?} (fraud status: {:?})",
            notification.transaction_status,
            notification.fraud_status
        );
        self.reconcile(&order_id, &notification.status_report()).await
    }

    /// Fetches the transaction status from the gateway and reconciles the donation with it. Used to recover from lost
    /// notifications.
    pub async fn sync_with_gateway(&self, order_id: &OrderId) -> Result<ReconciliationOutcome, ReconciliationError> {
        if self.db.fetch_donation_by_order_id(order_id).await?.is_none() {
            return Err(ReconciliationError::DonationNotFound(order_id.clone()));
        }
        let report = self.gateway.check_transaction_status(order_id).await.map_err(|e| {
            warn!("🔄️🔁️ Could not fetch the gateway status for [{order_id}]. {e}");
            ReconciliationError::from(e)
        })?;
        debug!("🔄️🔁️ Gateway reports {:?} for [{order_id}]", report.transaction_status);
        self.reconcile(order_id, &report).await
    }

    async fn reconcile(
        &self,
        order_id: &OrderId,
        report: &TransactionStatusReport,
    ) -> Result<ReconciliationOutcome, ReconciliationError> {
        let update = StatusUpdate::from(report);
        let reported_status = update.status;
        if reported_status == DonationStatus::Unknown {
            info!("🔄️🔔️ [{order_id}] has unrecognised gateway status {:?}", report.transaction_status);
        }
        let transition = self.db.apply_status_update(order_id, update).await.map_err(|e| match e {
            DonationStoreError::CampaignNotFound(campaign_id) => {
                error!(
                    "🔄️🔔️ DATA INTEGRITY FAILURE. Donation [{order_id}] was paid, but its campaign #{campaign_id} no \
                     longer exists. Nothing was changed."
                );
                ReconciliationError::CampaignVanished { order_id: order_id.clone(), campaign_id }
            },
            DonationStoreError::DonationNotFound(_) => {
                debug!("🔄️🔔️ No donation exists for [{order_id}]");
                ReconciliationError::DonationNotFound(order_id.clone())
            },
            e => ReconciliationError::from(e),
        })?;
        let outcome = ReconciliationOutcome::new(reported_status, &transition);
        if outcome.status_changed {
            info!("🔄️🔔️ Donation [{order_id}] is now {}", outcome.donation.status);
        } else {
            debug!(
                "🔄️🔔️ Donation [{order_id}] stays {}. The gateway reported {reported_status}",
                outcome.donation.status
            );
        }
        self.call_donation_confirmed_hook(transition).await;
        Ok(outcome)
    }

    async fn call_donation_confirmed_hook(&self, transition: StatusTransition) {
        let StatusTransition { donation, confirmed_campaign, .. } = transition;
        let Some(campaign) = confirmed_campaign else {
            return;
        };
        if self.producers.has_subscribers() {
            debug!("🔄️🔔️ Notifying donation confirmed hook subscribers");
            self.producers.publish_donation_confirmed(&donation, &campaign).await;
        }
    }
}
