use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use donation_engine::{
    db_types::{DonationStatus, OrderId},
    donation_objects::ReconciliationOutcome,
    events::EventProducers,
    traits::{GatewayError, TransactionStatusReport},
    DonationStore,
    ReconciliationApi,
    SqliteDatabase,
};
use donor_common::{Rupiah, Secret};
use midtrans_tools::helpers::notification_signature;
use serde_json::{json, Value};

use super::{
    helpers::{error_message, send_request, TestBackend, TEST_SERVER_KEY},
    mocks::{accepting_gateway, MockGateway},
};
use crate::{
    middleware::SignatureMiddlewareFactory,
    routes::{PaymentNotificationRoute, SyncDonationRoute},
    server::NOTIFICATION_PATH,
};

fn configure(db: SqliteDatabase, gateway: MockGateway, signature_checks: bool) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = ReconciliationApi::new(db, gateway, EventProducers::default());
        let notifications = web::scope(NOTIFICATION_PATH)
            .wrap(SignatureMiddlewareFactory::new(Secret::new(TEST_SERVER_KEY.to_string()), signature_checks))
            .service(PaymentNotificationRoute::<SqliteDatabase, MockGateway>::new());
        cfg.service(notifications)
            .service(SyncDonationRoute::<SqliteDatabase, MockGateway>::new())
            .app_data(web::Data::new(api));
    }
}

fn notification_body(order_id: &OrderId, status: &str, fraud: &str, key: &str) -> Value {
    let gross_amount = "50000.00";
    let signature = notification_signature(order_id.as_str(), "200", gross_amount, key);
    json!({
        "transaction_time": "2024-06-01 10:15:00",
        "transaction_status": status,
        "transaction_id": "9aed5972-5b6a-401e-894b-a32c91ed1a3a",
        "status_message": "midtrans payment notification",
        "status_code": "200",
        "signature_key": signature,
        "payment_type": "bank_transfer",
        "order_id": order_id,
        "gross_amount": gross_amount,
        "fraud_status": fraud,
        "currency": "IDR"
    })
}

fn post_notification(body: Value) -> TestRequest {
    TestRequest::post().uri(NOTIFICATION_PATH).set_json(body)
}

fn outcome(body: &str) -> ReconciliationOutcome {
    serde_json::from_str(body).expect("Unexpected response body")
}

//----------------------------------------------   Notifications  ----------------------------------------------------

#[actix_web::test]
async fn settlement_confirms_donation() {
    let backend = TestBackend::new(1_000_000).await;
    let donation = backend.donate(50_000).await;
    let body = notification_body(&donation.order_id, "settlement", "accept", TEST_SERVER_KEY);
    let (status, body) =
        send_request(post_notification(body), configure(backend.db.clone(), accepting_gateway(), true)).await;
    assert_eq!(status, StatusCode::OK);
    let outcome = outcome(&body);
    assert!(outcome.newly_confirmed);
    assert!(outcome.status_changed);
    assert_eq!(outcome.donation.status, DonationStatus::Success);
    assert_eq!(outcome.donation.payment_method.as_deref(), Some("bank_transfer"));
    assert_eq!(backend.campaign().await.total_collected, Rupiah::from(50_000));
    backend.tear_down().await;
}

#[actix_web::test]
async fn duplicate_settlement_is_counted_once() {
    let backend = TestBackend::new(1_000_000).await;
    let donation = backend.donate(50_000).await;
    for expect_new in [true, false] {
        let body = notification_body(&donation.order_id, "settlement", "accept", TEST_SERVER_KEY);
        let (status, body) =
            send_request(post_notification(body), configure(backend.db.clone(), accepting_gateway(), true)).await;
        assert_eq!(status, StatusCode::OK);
        let outcome = outcome(&body);
        assert_eq!(outcome.newly_confirmed, expect_new);
        assert_eq!(outcome.donation.status, DonationStatus::Success);
    }
    assert_eq!(backend.campaign().await.total_collected, Rupiah::from(50_000));
    backend.tear_down().await;
}

#[actix_web::test]
async fn challenged_capture_stays_pending() {
    let backend = TestBackend::new(1_000_000).await;
    let donation = backend.donate(50_000).await;
    let body = notification_body(&donation.order_id, "capture", "challenge", TEST_SERVER_KEY);
    let (status, body) =
        send_request(post_notification(body), configure(backend.db.clone(), accepting_gateway(), true)).await;
    assert_eq!(status, StatusCode::OK);
    let outcome = outcome(&body);
    assert_eq!(outcome.reported_status, DonationStatus::Pending);
    assert_eq!(outcome.donation.status, DonationStatus::Pending);
    assert!(!outcome.newly_confirmed);
    assert_eq!(backend.campaign().await.total_collected, Rupiah::from(0));
    backend.tear_down().await;
}

#[actix_web::test]
async fn forged_signature_is_forbidden() {
    let backend = TestBackend::new(1_000_000).await;
    let donation = backend.donate(50_000).await;
    let body = notification_body(&donation.order_id, "settlement", "accept", "not-the-server-key");
    let (status, body) =
        send_request(post_notification(body), configure(backend.db.clone(), accepting_gateway(), true)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(error_message(&body).contains("Signature mismatch"));
    let stored = backend.db.fetch_donation_by_order_id(&donation.order_id).await.unwrap().unwrap();
    assert_eq!(stored.status, DonationStatus::Pending);
    assert_eq!(backend.campaign().await.total_collected, Rupiah::from(0));
    backend.tear_down().await;
}

#[actix_web::test]
async fn unsigned_notification_is_forbidden() {
    let backend = TestBackend::new(1_000_000).await;
    let donation = backend.donate(50_000).await;
    let body = json!({ "order_id": donation.order_id, "transaction_status": "settlement" });
    let (status, body) =
        send_request(post_notification(body), configure(backend.db.clone(), accepting_gateway(), true)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(error_message(&body).contains("No signature_key found"));
    assert_eq!(backend.campaign().await.total_collected, Rupiah::from(0));
    backend.tear_down().await;
}

#[actix_web::test]
async fn unsigned_notification_is_accepted_when_checks_are_off() {
    let backend = TestBackend::new(1_000_000).await;
    let donation = backend.donate(50_000).await;
    let body = json!({ "order_id": donation.order_id, "transaction_status": "settlement" });
    let (status, body) =
        send_request(post_notification(body), configure(backend.db.clone(), accepting_gateway(), false)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(outcome(&body).newly_confirmed);
    assert_eq!(backend.campaign().await.total_collected, Rupiah::from(50_000));
    backend.tear_down().await;
}

#[actix_web::test]
async fn notification_for_unknown_order_is_not_found() {
    let backend = TestBackend::new(1_000_000).await;
    let order_id = OrderId::from("DONATION-99-99-1700000000000");
    let body = notification_body(&order_id, "settlement", "accept", TEST_SERVER_KEY);
    let (status, body) =
        send_request(post_notification(body), configure(backend.db.clone(), accepting_gateway(), true)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error_message(&body).contains("DONATION-99-99-1700000000000"));
    assert_eq!(backend.campaign().await.total_collected, Rupiah::from(0));
    backend.tear_down().await;
}

#[actix_web::test]
async fn notification_without_order_id_is_a_bad_request() {
    let backend = TestBackend::new(1_000_000).await;
    let body = json!({ "transaction_status": "settlement" });
    let (status, body) =
        send_request(post_notification(body), configure(backend.db.clone(), accepting_gateway(), false)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("no order id"));
    backend.tear_down().await;
}

//----------------------------------------------   Sync  ----------------------------------------------------

#[actix_web::test]
async fn sync_applies_the_gateway_status() {
    let backend = TestBackend::new(1_000_000).await;
    let donation = backend.donate(50_000).await;
    let expected_id = donation.order_id.clone();
    let mut gateway = MockGateway::new();
    gateway.expect_create_transaction().never();
    gateway.expect_check_transaction_status().withf(move |id| *id == expected_id).times(1).returning(|_| {
        Ok(TransactionStatusReport {
            transaction_status: Some("settlement".into()),
            fraud_status: Some("accept".into()),
            payment_type: Some("gopay".into()),
        })
    });
    let req = TestRequest::post().uri(&format!("/donations/sync/{}", donation.order_id));
    let (status, body) = send_request(req, configure(backend.db.clone(), gateway, true)).await;
    assert_eq!(status, StatusCode::OK);
    let outcome = outcome(&body);
    assert!(outcome.newly_confirmed);
    assert_eq!(outcome.donation.payment_method.as_deref(), Some("gopay"));
    assert_eq!(backend.campaign().await.total_collected, Rupiah::from(50_000));
    backend.tear_down().await;
}

#[actix_web::test]
async fn sync_for_unknown_donation_does_not_call_the_gateway() {
    let backend = TestBackend::new(1_000_000).await;
    let mut gateway = MockGateway::new();
    gateway.expect_check_transaction_status().never();
    let req = TestRequest::post().uri("/donations/sync/DONATION-5-5-5");
    let (status, _) = send_request(req, configure(backend.db.clone(), gateway, true)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    backend.tear_down().await;
}

#[actix_web::test]
async fn sync_when_gateway_has_no_transaction() {
    let backend = TestBackend::new(1_000_000).await;
    let donation = backend.donate(50_000).await;
    let mut gateway = MockGateway::new();
    gateway.expect_check_transaction_status().returning(|id| Err(GatewayError::TransactionNotFound(id.clone())));
    let req = TestRequest::post().uri(&format!("/donations/sync/{}", donation.order_id));
    let (status, _) = send_request(req, configure(backend.db.clone(), gateway, true)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let stored = backend.db.fetch_donation_by_order_id(&donation.order_id).await.unwrap().unwrap();
    assert_eq!(stored.status, DonationStatus::Pending);
    backend.tear_down().await;
}

#[actix_web::test]
async fn sync_when_gateway_is_down() {
    let backend = TestBackend::new(1_000_000).await;
    let donation = backend.donate(50_000).await;
    let mut gateway = MockGateway::new();
    gateway.expect_check_transaction_status().returning(|_| Err(GatewayError::Communication("refused".into())));
    let req = TestRequest::post().uri(&format!("/donations/sync/{}", donation.order_id));
    let (status, body) = send_request(req, configure(backend.db.clone(), gateway, true)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(error_message(&body).contains("refused"));
    backend.tear_down().await;
}
