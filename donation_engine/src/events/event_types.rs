use serde::{Deserialize, Serialize};

use crate::db_types::{Campaign, Donation};

/// Published once, after a donation's first transition into `success` has been committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationConfirmedEvent {
    pub donation: Donation,
    /// The campaign, with the donation already added to its collected total
    pub campaign: Campaign,
}

impl DonationConfirmedEvent {
    pub fn new(donation: Donation, campaign: Campaign) -> Self {
        Self { donation, campaign }
    }
}
