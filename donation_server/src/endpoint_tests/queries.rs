use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use donation_engine::{
    db_types::{Campaign, Donation, DonationStatus, DonationSummary},
    events::EventProducers,
    notification_objects::PaymentNotification,
    test_utils::StubGateway,
    DonationQueryApi,
    ReconciliationApi,
    SqliteDatabase,
};
use donor_common::Rupiah;

use super::helpers::{error_message, send_request, TestBackend};
use crate::routes::{
    CampaignByIdRoute,
    CampaignDonationsRoute,
    CampaignSummaryRoute,
    DonationByIdRoute,
    DonationByOrderIdRoute,
    DonationSummaryRoute,
    DonationsForDonorRoute,
};

fn configure(db: SqliteDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = DonationQueryApi::new(db);
        cfg.service(DonationSummaryRoute::<SqliteDatabase>::new())
            .service(DonationByIdRoute::<SqliteDatabase>::new())
            .service(DonationByOrderIdRoute::<SqliteDatabase>::new())
            .service(DonationsForDonorRoute::<SqliteDatabase>::new())
            .service(CampaignByIdRoute::<SqliteDatabase>::new())
            .service(CampaignDonationsRoute::<SqliteDatabase>::new())
            .service(CampaignSummaryRoute::<SqliteDatabase>::new())
            .app_data(web::Data::new(api));
    }
}

async fn get(backend: &TestBackend, path: &str) -> (StatusCode, String) {
    send_request(TestRequest::get().uri(path), configure(backend.db.clone())).await
}

/// Two settled donations (50,000 and 20,000) and one that is still pending (5,000).
async fn seed(backend: &TestBackend) -> Vec<Donation> {
    let api = ReconciliationApi::new(backend.db.clone(), StubGateway::new(), EventProducers::default());
    let mut donations = Vec::new();
    for (amount, settle) in [(50_000, true), (20_000, true), (5_000, false)] {
        let donation = backend.donate(amount).await;
        if settle {
            let notification = PaymentNotification {
                order_id: Some(donation.order_id.to_string()),
                transaction_status: Some("settlement".into()),
                ..Default::default()
            };
            api.handle_notification(notification).await.expect("Error settling donation");
        }
        donations.push(donation);
    }
    donations
}

#[actix_web::test]
async fn donation_by_id_and_order_id() {
    let backend = TestBackend::new(1_000_000).await;
    let donations = seed(&backend).await;
    let first = &donations[0];

    let (status, body) = get(&backend, &format!("/donations/id/{}", first.id)).await;
    assert_eq!(status, StatusCode::OK);
    let donation: Donation = serde_json::from_str(&body).unwrap();
    assert_eq!(donation.order_id, first.order_id);
    assert_eq!(donation.status, DonationStatus::Success);

    let (status, body) = get(&backend, &format!("/donations/order/{}", donations[2].order_id)).await;
    assert_eq!(status, StatusCode::OK);
    let donation: Donation = serde_json::from_str(&body).unwrap();
    assert_eq!(donation.id, donations[2].id);
    assert_eq!(donation.status, DonationStatus::Pending);
    backend.tear_down().await;
}

#[actix_web::test]
async fn missing_donations_are_not_found() {
    let backend = TestBackend::new(1_000_000).await;
    let (status, body) = get(&backend, "/donations/id/4242").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error_message(&body).contains("Donation #4242"));
    let (status, _) = get(&backend, "/donations/order/DONATION-1-1-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    backend.tear_down().await;
}

#[actix_web::test]
async fn non_numeric_id_is_a_bad_request() {
    let backend = TestBackend::new(1_000_000).await;
    let (status, body) = get(&backend, "/donations/id/latest").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Could not read request path"));
    backend.tear_down().await;
}

#[actix_web::test]
async fn donations_for_donor_and_campaign() {
    let backend = TestBackend::new(1_000_000).await;
    seed(&backend).await;

    let (status, body) = get(&backend, &format!("/donations/donor/{}", backend.donor.id)).await;
    assert_eq!(status, StatusCode::OK);
    let donations: Vec<Donation> = serde_json::from_str(&body).unwrap();
    assert_eq!(donations.len(), 3);
    assert!(donations.iter().all(|d| d.donor_id == backend.donor.id));

    let (status, body) = get(&backend, &format!("/campaigns/{}/donations", backend.campaign.id)).await;
    assert_eq!(status, StatusCode::OK);
    let donations: Vec<Donation> = serde_json::from_str(&body).unwrap();
    assert_eq!(donations.len(), 3);

    let (status, body) = get(&backend, "/donations/donor/777").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
    backend.tear_down().await;
}

#[actix_web::test]
async fn campaign_and_summaries() {
    let backend = TestBackend::new(1_000_000).await;
    seed(&backend).await;

    let (status, body) = get(&backend, &format!("/campaigns/{}", backend.campaign.id)).await;
    assert_eq!(status, StatusCode::OK);
    let campaign: Campaign = serde_json::from_str(&body).unwrap();
    assert_eq!(campaign.total_collected, Rupiah::from(70_000));
    assert_eq!(campaign.title, "Sumur Bersih");

    let expected = DonationSummary { total_transactions: 2, total_amount: Rupiah::from(70_000) };
    let (status, body) = get(&backend, &format!("/campaigns/{}/summary", backend.campaign.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<DonationSummary>(&body).unwrap(), expected);

    let (status, body) = get(&backend, "/donations/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<DonationSummary>(&body).unwrap(), expected);
    backend.tear_down().await;
}

#[actix_web::test]
async fn unknown_campaign_is_not_found() {
    let backend = TestBackend::new(1_000_000).await;
    let missing = backend.campaign.id + 1;
    let (status, _) = get(&backend, &format!("/campaigns/{missing}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&backend, &format!("/campaigns/{missing}/summary")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    backend.tear_down().await;
}
