use std::{fmt::Display, str::FromStr, time::Duration};

use donor_common::Secret;
use log::*;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MidtransEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl MidtransEnvironment {
    /// Base URL for the Snap (hosted payment page) API
    pub fn snap_base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://app.sandbox.midtrans.com",
            Self::Production => "https://app.midtrans.com",
        }
    }

    /// Base URL for the Core API
    pub fn api_base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://api.sandbox.midtrans.com",
            Self::Production => "https://api.midtrans.com",
        }
    }
}

impl FromStr for MidtransEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(format!("{other} is not a Midtrans environment. Use 'sandbox' or 'production'")),
        }
    }
}

impl Display for MidtransEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sandbox => write!(f, "sandbox"),
            Self::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MidtransConfig {
    pub server_key: Secret<String>,
    pub client_key: String,
    pub environment: MidtransEnvironment,
    /// Upper bound on every HTTP round-trip to Midtrans.
    pub timeout: Duration,
}

impl Default for MidtransConfig {
    fn default() -> Self {
        Self {
            server_key: Secret::default(),
            client_key: String::default(),
            environment: MidtransEnvironment::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl MidtransConfig {
    pub fn new_from_env_or_default() -> Self {
        let server_key = Secret::new(std::env::var("DONOR_MIDTRANS_SERVER_KEY").unwrap_or_else(|_| {
            warn!("🪛️ DONOR_MIDTRANS_SERVER_KEY not set. Payment sessions cannot be created without it.");
            String::default()
        }));
        let client_key = std::env::var("DONOR_MIDTRANS_CLIENT_KEY").unwrap_or_else(|_| {
            warn!("🪛️ DONOR_MIDTRANS_CLIENT_KEY not set, using an empty client key");
            String::default()
        });
        let environment = std::env::var("DONOR_MIDTRANS_ENVIRONMENT")
            .ok()
            .map(|s| {
                s.parse::<MidtransEnvironment>().unwrap_or_else(|e| {
                    warn!("🪛️ {e}. Falling back to the sandbox.");
                    MidtransEnvironment::Sandbox
                })
            })
            .unwrap_or_default();
        let timeout = std::env::var("DONOR_MIDTRANS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🪛️ {s} is not a valid DONOR_MIDTRANS_TIMEOUT_SECS. {e}. Using the default."))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        info!("🪛️ Midtrans environment: {environment}. Request timeout: {}s", timeout.as_secs());
        Self { server_key, client_key, environment, timeout }
    }
}
