use donor_common::Rupiah;
use thiserror::Error;

use crate::{
    db_types::OrderId,
    traits::{DonationStoreError, GatewayError},
};

/// Errors from creating a donation.
#[derive(Debug, Clone, Error)]
pub enum DonationFlowError {
    #[error("Invalid donation amount: {0}. Donations must be positive")]
    InvalidAmount(Rupiah),
    #[error("Campaign {0} does not exist")]
    CampaignNotFound(i64),
    #[error("Campaign {0} has already reached its target")]
    CampaignTargetReached(i64),
    #[error("Could not start the payment for donation {order_id}. {reason}")]
    PaymentInitiationFailed { order_id: OrderId, reason: GatewayError },
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DonationStoreError> for DonationFlowError {
    fn from(e: DonationStoreError) -> Self {
        match e {
            DonationStoreError::CampaignNotFound(id) => Self::CampaignNotFound(id),
            DonationStoreError::InvalidAmount(amount) => Self::InvalidAmount(amount),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

/// Errors from reconciling a gateway notification or a gateway status check.
#[derive(Debug, Clone, Error)]
pub enum ReconciliationError {
    #[error("The notification has no order id")]
    MissingOrderId,
    #[error("No donation exists for order id {0}")]
    DonationNotFound(OrderId),
    #[error("Data integrity failure. Donation {order_id} belongs to campaign {campaign_id}, which does not exist")]
    CampaignVanished { order_id: OrderId, campaign_id: i64 },
    #[error("Could not fetch the transaction status from the payment gateway. {0}")]
    GatewayError(#[from] GatewayError),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DonationStoreError> for ReconciliationError {
    fn from(e: DonationStoreError) -> Self {
        match e {
            DonationStoreError::DonationNotFound(order_id) => Self::DonationNotFound(order_id),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}
