use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use donor_common::{helpers::non_blank_or, Rupiah};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid donation status: {0}")]
pub struct ConversionError(String);

//--------------------------------------        OrderId        ---------------------------------------------------------
/// The provider-visible identifier that correlates a donation with its gateway transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------    DonationStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    /// The donation has been created and is waiting for the donor to pay.
    Pending,
    /// The gateway has confirmed the payment. This status is final.
    Success,
    /// The payment session could not be created, or the gateway reported the payment as denied, cancelled or expired.
    Failed,
    /// The gateway reported a status that has no internal meaning. Kept for auditing.
    Unknown,
}

impl DonationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

impl Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for DonationStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            "unknown" => Ok(Self::Unknown),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        Campaign       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub title: String,
    pub owner_id: i64,
    pub target_total: Rupiah,
    pub total_collected: Rupiah,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    pub fn has_reached_target(&self) -> bool {
        self.total_collected >= self.target_total
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCampaign {
    pub title: String,
    pub owner_id: i64,
    pub target_total: Rupiah,
}

impl NewCampaign {
    pub fn new<S: Into<String>>(title: S, owner_id: i64, target_total: Rupiah) -> Self {
        Self { title: title.into(), owner_id, target_total }
    }
}

//--------------------------------------      DonorProfile     ---------------------------------------------------------
/// Contact details for a donor, as published by the user service. None of the fields are guaranteed to be filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct DonorProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
}

pub const ANONYMOUS_DONOR_NAME: &str = "Anonim";
pub const PLACEHOLDER_EMAIL: &str = "no-reply@amalsas.id";
pub const PLACEHOLDER_PHONE: &str = "0000000000";

impl DonorProfile {
    /// "first last", or the username, or [`ANONYMOUS_DONOR_NAME`], whichever is first to be non-blank.
    pub fn display_name(&self) -> String {
        let full_name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let username = non_blank_or(&self.username, ANONYMOUS_DONOR_NAME);
        non_blank_or(&full_name, username).to_string()
    }

    pub fn contact_email(&self) -> String {
        non_blank_or(&self.email, PLACEHOLDER_EMAIL).to_string()
    }

    pub fn contact_phone(&self) -> String {
        non_blank_or(&self.phone, PLACEHOLDER_PHONE).to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDonor {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
}

//--------------------------------------        Donation       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Donation {
    pub id: i64,
    pub order_id: OrderId,
    pub campaign_id: i64,
    pub donor_id: i64,
    pub amount: Rupiah,
    pub status: DonationStatus,
    pub payment_url: Option<String>,
    pub payment_token: Option<String>,
    /// The payment method the gateway reported first, e.g. `bank_transfer` or `gopay`.
    pub payment_method: Option<String>,
    /// The raw transaction status string from the most recent notification.
    pub provider_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDonation {
    pub order_id: OrderId,
    pub campaign_id: i64,
    pub donor_id: i64,
    pub amount: Rupiah,
}

impl NewDonation {
    pub fn new(order_id: OrderId, campaign_id: i64, donor_id: i64, amount: Rupiah) -> Self {
        Self { order_id, campaign_id, donor_id, amount }
    }
}

//--------------------------------------    DonationSummary    ---------------------------------------------------------
/// Count and total value of confirmed donations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct DonationSummary {
    pub total_transactions: i64,
    pub total_amount: Rupiah,
}
