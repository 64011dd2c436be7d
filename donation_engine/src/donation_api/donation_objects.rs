use donor_common::Rupiah;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Campaign, Donation, DonationStatus, DonorProfile},
    traits::{StatusTransition, TransactionRequest},
};

pub const GENERIC_ITEM_LABEL: &str = "Donasi AmalSAS";

/// A donor's request to give `amount` to a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationRequest {
    pub amount: Rupiah,
    pub donor_id: i64,
    pub campaign_id: i64,
}

impl DonationRequest {
    pub fn new(amount: Rupiah, donor_id: i64, campaign_id: i64) -> Self {
        Self { amount, donor_id, campaign_id }
    }
}

/// A freshly created donation, along with the payment session the donor must complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedDonation {
    pub donation: Donation,
    pub payment_url: String,
    pub token: String,
}

/// The line-item label shown on the payment page.
pub fn item_label(campaign_title: &str) -> String {
    let title = campaign_title.trim();
    if title.is_empty() {
        GENERIC_ITEM_LABEL.to_string()
    } else {
        format!("Donasi untuk {title}")
    }
}

/// Builds the gateway request for a stored donation. A missing donor profile gets the same fallbacks as a blank one.
pub fn transaction_request_for(
    donation: &Donation,
    campaign: &Campaign,
    donor: Option<&DonorProfile>,
) -> TransactionRequest {
    let blank = DonorProfile::default();
    let donor = donor.unwrap_or(&blank);
    TransactionRequest {
        order_id: donation.order_id.clone(),
        amount: donation.amount,
        customer_name: donor.display_name(),
        customer_email: donor.contact_email(),
        customer_phone: donor.contact_phone(),
        item_id: format!("ITEM-{}", campaign.id),
        item_label: item_label(&campaign.title),
    }
}

/// What reconciliation did with a status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    pub donation: Donation,
    /// The status the provider's report mapped to. This can differ from `donation.status` when the transition was not
    /// allowed, e.g. a late `pending` for a donation that has already succeeded.
    pub reported_status: DonationStatus,
    pub status_changed: bool,
    /// True only for the report that moved the donation into `success` and added it to the campaign total.
    pub newly_confirmed: bool,
}

impl ReconciliationOutcome {
    pub fn new(reported_status: DonationStatus, transition: &StatusTransition) -> Self {
        Self {
            donation: transition.donation.clone(),
            reported_status,
            status_changed: transition.status_changed,
            newly_confirmed: transition.is_newly_confirmed(),
        }
    }
}
