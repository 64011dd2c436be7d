use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use donation_engine::{
    events::EventProducers,
    DonationFlowApi,
    DonationQueryApi,
    ReconciliationApi,
    SqliteDatabase,
};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::{event_hooks::create_event_handlers, midtrans::MidtransGateway},
    middleware::SignatureMiddlewareFactory,
    routes::{
        health,
        CampaignByIdRoute,
        CampaignDonationsRoute,
        CampaignSummaryRoute,
        CreateDonationRoute,
        DonationByIdRoute,
        DonationByOrderIdRoute,
        DonationSummaryRoute,
        DonationsForDonorRoute,
        PaymentNotificationRoute,
        SyncDonationRoute,
    },
};

pub const NOTIFICATION_PATH: &str = "/donations/notifications";

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = MidtransGateway::new(config.midtrans.clone())
        .map_err(|e| ServerError::InitializeError(format!("Could not create the Midtrans client. {e}")))?;
    let handlers = create_event_handlers();
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, gateway, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: MidtransGateway,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let server_key = config.midtrans.server_key.clone();
    let signature_checks = config.signature_checks;
    info!("💻️ Notification signature checks are {}", if signature_checks { "on" } else { "OFF" });
    let srv = HttpServer::new(move || {
        let flow_api = DonationFlowApi::new(db.clone(), gateway.clone());
        let reconciliation_api = ReconciliationApi::new(db.clone(), gateway.clone(), producers.clone());
        let query_api = DonationQueryApi::new(db.clone());
        let notifications_scope = web::scope(NOTIFICATION_PATH)
            .wrap(SignatureMiddlewareFactory::new(server_key.clone(), signature_checks))
            .service(PaymentNotificationRoute::<SqliteDatabase, MidtransGateway>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("donor::access_log"))
            .app_data(json_config())
            .app_data(path_config())
            .app_data(web::Data::new(flow_api))
            .app_data(web::Data::new(reconciliation_api))
            .app_data(web::Data::new(query_api))
            .service(health)
            .service(notifications_scope)
            .service(CreateDonationRoute::<SqliteDatabase, MidtransGateway>::new())
            .service(SyncDonationRoute::<SqliteDatabase, MidtransGateway>::new())
            .service(DonationSummaryRoute::<SqliteDatabase>::new())
            .service(DonationByIdRoute::<SqliteDatabase>::new())
            .service(DonationByOrderIdRoute::<SqliteDatabase>::new())
            .service(DonationsForDonorRoute::<SqliteDatabase>::new())
            .service(CampaignByIdRoute::<SqliteDatabase>::new())
            .service(CampaignDonationsRoute::<SqliteDatabase>::new())
            .service(CampaignSummaryRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed JSON bodies are reported with the server's JSON error format.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|e, _req| {
        debug!("💻️ Rejecting request body. {e}");
        ServerError::InvalidRequestBody(e.to_string()).into()
    })
}

/// Path segments that don't parse (e.g. a non-numeric id) are a 400 rather than actix's default 404.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|e, _req| {
        debug!("💻️ Rejecting request path. {e}");
        ServerError::InvalidRequestPath(e.to_string()).into()
    })
}
