use std::env;

use donor_common::helpers::parse_boolean_flag;
use log::*;
use midtrans_tools::MidtransConfig;

const DEFAULT_DONOR_HOST: &str = "127.0.0.1";
const DEFAULT_DONOR_PORT: u16 = 8470;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/donations.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// If false, payment notifications are accepted without checking their `signature_key`. **DANGER**
    pub signature_checks: bool,
    pub midtrans: MidtransConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DONOR_HOST.to_string(),
            port: DEFAULT_DONOR_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            signature_checks: true,
            midtrans: MidtransConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("DONOR_HOST").ok().unwrap_or_else(|| DEFAULT_DONOR_HOST.into());
        let port = env::var("DONOR_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for DONOR_PORT. {e} Using the default, {DEFAULT_DONOR_PORT}, \
                         instead."
                    );
                    DEFAULT_DONOR_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_DONOR_PORT);
        let database_url = env::var("DONOR_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ DONOR_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = env::var("DONOR_DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| {
                s.parse::<u32>()
                    .map_err(|e| {
                        error!("🪛️ {s} is not a valid DONOR_DATABASE_MAX_CONNECTIONS. {e}. Using the default.");
                    })
                    .ok()
            })
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let signature_checks = parse_boolean_flag(env::var("DONOR_NOTIFICATION_SIGNATURE_CHECKS").ok(), true);
        if !signature_checks {
            warn!(
                "🪛️ Notification signature checks are DISABLED. Anyone who can reach the server can mark donations \
                 as paid."
            );
        }
        let midtrans = MidtransConfig::new_from_env_or_default();
        Self { host, port, database_url, max_connections, signature_checks, midtrans }
    }
}
