//! # Donation engine public API
//!
//! The `donation_api` module exposes the programmatic API of the donation engine. The API is modular, so that clients
//! can pick the parts they need.
//!
//! * [`donation_flow_api`] creates donations and opens payment sessions for them.
//! * [`reconciliation_api`] applies gateway notifications and status checks to donations and campaign totals.
//! * [`donation_query_api`] answers read-only questions about donations and campaigns.
//!
//! # API usage
//!
//! An API instance is created by supplying a backend that implements the storage traits it needs, and, where the API
//! talks to the payment provider, a [`crate::traits::PaymentGateway`].
//!
//! ```rust,ignore
//! use donation_engine::{DonationQueryApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = DonationQueryApi::new(db);
//! let summary = api.summary().await?;
//! ```
pub mod donation_flow_api;
pub mod donation_objects;
pub mod donation_query_api;
pub mod errors;
pub mod notification_objects;
pub mod reconciliation_api;
