//! The payment provider's status vocabulary, and its translation into [`DonationStatus`].
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    db_types::{DonationStatus, OrderId},
    traits::{StatusUpdate, TransactionStatusReport},
};

//--------------------------------------   PaymentNotification   -------------------------------------------------------
/// The body of an HTTP notification from the payment provider.
///
/// Only `order_id`, `transaction_status`, `fraud_status` and `payment_type` drive reconciliation. `status_code`,
/// `gross_amount` and `signature_key` are used to authenticate the notification. Any other field is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentNotification {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub transaction_status: Option<String>,
    #[serde(default)]
    pub fraud_status: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub status_code: Option<String>,
    #[serde(default)]
    pub gross_amount: Option<String>,
    #[serde(default)]
    pub signature_key: Option<String>,
}

impl PaymentNotification {
    /// The order id, if present and not blank.
    pub fn order_id(&self) -> Option<OrderId> {
        self.order_id.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(OrderId::from)
    }

    pub fn status_report(&self) -> TransactionStatusReport {
        TransactionStatusReport {
            transaction_status: self.transaction_status.clone(),
            fraud_status: self.fraud_status.clone(),
            payment_type: self.payment_type.clone(),
        }
    }
}

//--------------------------------------    TransactionStatus    -------------------------------------------------------
/// The provider's `transaction_status` vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Capture,
    Settlement,
    Pending,
    Deny,
    Cancel,
    Expire,
    Authorize,
    Refund,
    PartialRefund,
    Chargeback,
    PartialChargeback,
    Failure,
    /// A status this engine does not know about, or no status at all. The raw value is kept.
    Unrecognized(String),
}

impl From<&str> for TransactionStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "capture" => Self::Capture,
            "settlement" => Self::Settlement,
            "pending" => Self::Pending,
            "deny" => Self::Deny,
            "cancel" => Self::Cancel,
            "expire" => Self::Expire,
            "authorize" => Self::Authorize,
            "refund" => Self::Refund,
            "partial_refund" => Self::PartialRefund,
            "chargeback" => Self::Chargeback,
            "partial_chargeback" => Self::PartialChargeback,
            "failure" => Self::Failure,
            _ => Self::Unrecognized(s.to_string()),
        }
    }
}

impl From<Option<&str>> for TransactionStatus {
    fn from(s: Option<&str>) -> Self {
        s.map(Self::from).unwrap_or_else(|| Self::Unrecognized(String::new()))
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Capture => "capture",
            Self::Settlement => "settlement",
            Self::Pending => "pending",
            Self::Deny => "deny",
            Self::Cancel => "cancel",
            Self::Expire => "expire",
            Self::Authorize => "authorize",
            Self::Refund => "refund",
            Self::PartialRefund => "partial_refund",
            Self::Chargeback => "chargeback",
            Self::PartialChargeback => "partial_chargeback",
            Self::Failure => "failure",
            Self::Unrecognized(s) => s.as_str(),
        };
        write!(f, "{s}")
    }
}

//--------------------------------------       FraudStatus       -------------------------------------------------------
/// The provider's `fraud_status` vocabulary. Only meaningful for card captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FraudStatus {
    Accept,
    Challenge,
    Deny,
    Absent,
    Unrecognized(String),
}

impl From<Option<&str>> for FraudStatus {
    fn from(s: Option<&str>) -> Self {
        let Some(raw) = s else {
            return Self::Absent;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "" => Self::Absent,
            "accept" => Self::Accept,
            "challenge" => Self::Challenge,
            "deny" => Self::Deny,
            _ => Self::Unrecognized(raw.to_string()),
        }
    }
}

//--------------------------------------      Status mapping     -------------------------------------------------------
/// Maps the provider's transaction and fraud statuses onto the internal donation status.
///
/// | transaction status      | fraud status    | donation status |
/// |-------------------------|-----------------|-----------------|
/// | capture                 | accept          | success         |
/// | capture                 | challenge       | pending         |
/// | capture                 | anything else   | failed          |
/// | settlement              |                 | success         |
/// | pending                 |                 | pending         |
/// | deny, cancel, expire    |                 | failed          |
/// | anything else           |                 | unknown         |
pub fn donation_status_for(transaction_status: &TransactionStatus, fraud_status: &FraudStatus) -> DonationStatus {
    use TransactionStatus::*;
    match (transaction_status, fraud_status) {
        (Capture, FraudStatus::Accept) => DonationStatus::Success,
        (Capture, FraudStatus::Challenge) => DonationStatus::Pending,
        (Capture, FraudStatus::Deny | FraudStatus::Absent | FraudStatus::Unrecognized(_)) => DonationStatus::Failed,
        (Settlement, _) => DonationStatus::Success,
        (Pending, _) => DonationStatus::Pending,
        (Deny | Cancel | Expire, _) => DonationStatus::Failed,
        (
            Authorize | Refund | PartialRefund | Chargeback | PartialChargeback | Failure | Unrecognized(_),
            _,
        ) => DonationStatus::Unknown,
    }
}

impl From<&TransactionStatusReport> for StatusUpdate {
    fn from(report: &TransactionStatusReport) -> Self {
        let tx_status = TransactionStatus::from(report.transaction_status.as_deref());
        let fraud_status = FraudStatus::from(report.fraud_status.as_deref());
        let status = donation_status_for(&tx_status, &fraud_status);
        let payment_method = report.payment_type.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let provider_status = report.transaction_status.as_deref().map(str::trim).filter(|s| !s.is_empty());
        StatusUpdate::new(status).with_payment_method(payment_method).with_provider_status(provider_status)
    }
}
