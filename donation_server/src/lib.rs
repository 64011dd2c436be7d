//! # Donation server
//! This crate hosts the HTTP server for the donation engine. It is responsible for:
//! Accepting new donations and opening Midtrans payment sessions for them.
//! Receiving Midtrans payment notifications, verifying their signatures and passing them to the reconciler.
//! Answering read-only queries about donations and campaigns.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /donations`: Create a donation.
//! * `POST /donations/notifications`: The Midtrans notification endpoint.
//! * `POST /donations/sync/{order_id}`: Reconcile a donation against the gateway's current status.
//! * `GET /donations/...` and `GET /campaigns/...`: Read-only queries. See [routes](routes/index.html).

pub mod cli;
pub mod config;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
