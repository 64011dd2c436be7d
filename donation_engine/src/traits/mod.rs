//! # Storage and gateway contracts
//!
//! This module defines the behaviour that backends need to expose to be driven by the donation engine.
//!
//! * [`DonationStore`] persists donation attempts and owns the atomic "status transition + campaign total" unit of
//!   work used by reconciliation.
//! * [`CampaignManagement`] reads campaigns and applies the Campaign Aggregator increment.
//! * [`DonorDirectory`] is a read-only view of donor contact details.
//! * [`PaymentGateway`] is the contract for the external payment provider.
//!
//! All the storage traits share the [`DonationStoreError`] error type.
mod campaign_management;
mod data_objects;
mod donation_store;
mod donor_directory;
mod payment_gateway;

pub use campaign_management::CampaignManagement;
pub use data_objects::{StatusTransition, StatusUpdate};
pub use donation_store::{DonationStore, DonationStoreError};
pub use donor_directory::DonorDirectory;
pub use payment_gateway::{GatewayError, PaymentGateway, PaymentSession, TransactionRequest, TransactionStatusReport};
