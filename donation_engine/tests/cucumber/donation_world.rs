use std::collections::HashMap;

use cucumber::World;
use donation_engine::{
    db_types::{Campaign, OrderId},
    events::EventProducers,
    test_utils::{
        prepare_env::{create_database, random_db_path, run_migrations},
        StubGateway,
    },
    DonationFlowApi,
    DonationFlowError,
    ReconciliationApi,
    ReconciliationError,
    SqliteDatabase,
};
use log::*;

#[derive(Default, Debug, World)]
pub struct DonationWorld {
    pub system: Option<DonationSystem>,
    /// The error from the most recent step that was expected to possibly fail
    pub last_error: Option<String>,
}

#[derive(Debug)]
pub struct DonationSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub gateway: StubGateway,
    pub campaigns: HashMap<String, Campaign>,
    pub donors: HashMap<String, i64>,
    pub donations: HashMap<String, OrderId>,
}

impl DonationWorld {
    pub fn system(&self) -> &DonationSystem {
        self.system.as_ref().expect("Donation system not initialised")
    }

    pub fn system_mut(&mut self) -> &mut DonationSystem {
        self.system.as_mut().expect("Donation system not initialised")
    }
}

impl DonationSystem {
    pub async fn new() -> Self {
        let url = prepare_test_env().await;
        let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
        debug!("Created database: {url}");
        Self {
            db_path: url,
            db,
            gateway: StubGateway::new(),
            campaigns: HashMap::new(),
            donors: HashMap::new(),
            donations: HashMap::new(),
        }
    }

    pub fn flow_api(&self) -> DonationFlowApi<SqliteDatabase, StubGateway> {
        DonationFlowApi::new(self.db.clone(), self.gateway.clone())
    }

    pub fn reconciliation_api(&self) -> ReconciliationApi<SqliteDatabase, StubGateway> {
        ReconciliationApi::new(self.db.clone(), self.gateway.clone(), EventProducers::default())
    }

    pub fn campaign(&self, name: &str) -> &Campaign {
        self.campaigns.get(name).unwrap_or_else(|| panic!("No campaign called {name}"))
    }

    /// Unknown donor names map to a donor id with no profile.
    pub fn donor_id(&self, name: &str) -> i64 {
        self.donors.get(name).copied().unwrap_or(9_999)
    }

    pub fn order_id(&self, donation: &str) -> &OrderId {
        self.donations.get(donation).unwrap_or_else(|| panic!("No donation called {donation}"))
    }
}

pub fn flow_error_kind(err: &DonationFlowError) -> &'static str {
    match err {
        DonationFlowError::InvalidAmount(_) => "InvalidAmount",
        DonationFlowError::CampaignNotFound(_) => "CampaignNotFound",
        DonationFlowError::CampaignTargetReached(_) => "CampaignTargetReached",
        DonationFlowError::PaymentInitiationFailed { .. } => "PaymentInitiationFailed",
        DonationFlowError::DatabaseError(_) => "DatabaseError",
    }
}

pub fn reconciliation_error_kind(err: &ReconciliationError) -> &'static str {
    match err {
        ReconciliationError::MissingOrderId => "MissingOrderID",
        ReconciliationError::DonationNotFound(_) => "DonationNotFound",
        ReconciliationError::CampaignVanished { .. } => "CampaignNotFound",
        ReconciliationError::GatewayError(_) => "GatewayError",
        ReconciliationError::DatabaseError(_) => "DatabaseError",
    }
}

pub async fn prepare_test_env() -> String {
    let path = random_db_path();
    create_database(&path).await;
    run_migrations(&path).await;
    path
}
