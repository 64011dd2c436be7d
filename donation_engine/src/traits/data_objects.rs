use serde::{Deserialize, Serialize};

use crate::db_types::{Campaign, Donation, DonationStatus};

/// A status report from the gateway, already translated into the internal vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: DonationStatus,
    pub payment_method: Option<String>,
    /// The gateway's own transaction status string, kept for auditing.
    pub provider_status: Option<String>,
}

impl StatusUpdate {
    pub fn new(status: DonationStatus) -> Self {
        Self { status, payment_method: None, provider_status: None }
    }

    pub fn with_payment_method<S: Into<String>>(mut self, method: Option<S>) -> Self {
        self.payment_method = method.map(Into::into);
        self
    }

    pub fn with_provider_status<S: Into<String>>(mut self, status: Option<S>) -> Self {
        self.provider_status = status.map(Into::into);
        self
    }
}

/// The result of applying a [`StatusUpdate`] to a donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    /// The donation as it is after the update
    pub donation: Donation,
    /// True if the update changed the donation's status
    pub status_changed: bool,
    /// Set only when this update was the donation's first transition into `success`. Holds the campaign with the
    /// incremented total.
    pub confirmed_campaign: Option<Campaign>,
}

impl StatusTransition {
    pub fn unchanged(donation: Donation) -> Self {
        Self { donation, status_changed: false, confirmed_campaign: None }
    }

    pub fn changed(donation: Donation) -> Self {
        Self { donation, status_changed: true, confirmed_campaign: None }
    }

    pub fn confirmed(donation: Donation, campaign: Campaign) -> Self {
        Self { donation, status_changed: true, confirmed_campaign: Some(campaign) }
    }

    pub fn is_newly_confirmed(&self) -> bool {
        self.confirmed_campaign.is_some()
    }
}
