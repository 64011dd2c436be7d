//! # SQLite backend
//!
//! The submodules contain "low-level" SQLite interactions. They are plain functions (rather than stateful structs)
//! that accept a `&mut SqliteConnection` argument, so that callers can obtain a connection from a pool, or open an
//! atomic transaction as the need arises, and call through to the functions without any other changes.
//!
//! [`SqliteDatabase`] stitches these together into implementations of the storage traits.
use std::{env, str::FromStr, time::Duration};

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Error as SqlxError,
    SqlitePool,
};

pub mod campaigns;
pub mod donations;
pub mod donors;
mod sqlite_impl;

pub use sqlite_impl::SqliteDatabase;

const SQLITE_DB_URL: &str = "sqlite://data/donations.db";
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

pub fn db_url() -> String {
    let result = env::var("DONOR_DATABASE_URL").unwrap_or_else(|_| {
        info!("DONOR_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

/// Opens a connection pool in WAL mode. Concurrent writers wait on the busy timeout rather than failing immediately.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}
