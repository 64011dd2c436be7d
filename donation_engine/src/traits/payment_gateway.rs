use donor_common::Rupiah;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::OrderId;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("The payment gateway did not respond in time")]
    Timeout,
    #[error("The payment gateway rejected the request. {0}")]
    Rejected(String),
    #[error("The payment gateway has no transaction for order {0}")]
    TransactionNotFound(OrderId),
    #[error("Could not communicate with the payment gateway. {0}")]
    Communication(String),
}

/// Everything the gateway needs to open a hosted payment session for a donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub order_id: OrderId,
    pub amount: Rupiah,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub item_id: String,
    pub item_label: String,
}

/// A redirectable payment session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    pub redirect_url: String,
    pub token: String,
}

/// The provider's current view of a transaction, in the provider's own vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatusReport {
    pub transaction_status: Option<String>,
    pub fraud_status: Option<String>,
    pub payment_type: Option<String>,
}

/// The contract for an external payment provider.
///
/// Implementations are constructed once at start-up and handed to the APIs that need them.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// Opens a payment session for the donation described in `request`.
    async fn create_transaction(&self, request: TransactionRequest) -> Result<PaymentSession, GatewayError>;

    /// Asks the provider for the current status of the transaction for `order_id`.
    async fn check_transaction_status(&self, order_id: &OrderId) -> Result<TransactionStatusReport, GatewayError>;
}
