//! A small client for the parts of the Midtrans payment gateway used by the donation server:
//!
//! * Snap, which creates a hosted payment session for an order and returns its redirect URL.
//! * The Core API transaction status query.
//! * The notification signature scheme used to authenticate HTTP notifications.
mod api;
mod config;
mod error;

mod data_objects;
pub mod helpers;

pub use api::MidtransApi;
pub use config::{MidtransConfig, MidtransEnvironment};
pub use data_objects::{
    CustomerDetails,
    ItemDetails,
    SnapRequest,
    SnapResponse,
    TransactionDetails,
    TransactionStatusResponse,
};
pub use error::MidtransApiError;
