//! Donation Engine
//!
//! The donation engine tracks donations to fundraising campaigns through their payment lifecycle, and reconciles the
//! payment provider's asynchronous status reports with donation and campaign records. It is provider-agnostic.
//!
//! The library is divided into two main sections:
//! 1. Storage ([`mod@traits`] and the SQLite backend). You should never need to access the database directly. Instead,
//!    use the public API. The exception is the data types used in the database. These are defined in the `db_types`
//!    module and are public.
//! 2. The public API ([`mod@donation_api`]). This creates donations, reconciles gateway reports, and answers queries.
//!    Backends need to implement the traits in [`mod@traits`] to be driven by it, and the payment provider needs to be
//!    wrapped in a [`traits::PaymentGateway`].
//!
//! The engine also publishes events that can be subscribed to. When a donation is confirmed, a
//! [`events::DonationConfirmedEvent`] is emitted once the change has been committed.
mod db;

pub mod db_types;
pub mod donation_api;
pub mod events;
pub mod helpers;
#[cfg(all(feature = "sqlite", any(feature = "test_utils", test)))]
pub mod test_utils;
pub mod traits;

#[cfg(feature = "sqlite")]
pub use db::sqlite::SqliteDatabase;
pub use donation_api::{
    donation_flow_api::DonationFlowApi,
    donation_objects,
    donation_query_api::DonationQueryApi,
    errors::{DonationFlowError, ReconciliationError},
    notification_objects,
    reconciliation_api::ReconciliationApi,
};
pub use traits::{CampaignManagement, DonationStore, DonorDirectory, PaymentGateway};
