use cucumber::{then, when};
use donation_engine::{
    db_types::{DonationStatus, OrderId},
    donation_objects::DonationRequest,
    notification_objects::PaymentNotification,
    CampaignManagement,
    DonationStore,
};
use donor_common::Rupiah;

use crate::cucumber::{
    donation_world::{flow_error_kind, reconciliation_error_kind},
    DonationWorld,
};

fn notification(order_id: &OrderId, status: &str, fraud_status: Option<String>) -> PaymentNotification {
    PaymentNotification {
        order_id: Some(order_id.to_string()),
        transaction_status: Some(status.to_string()),
        fraud_status,
        payment_type: Some("qris".to_string()),
        ..Default::default()
    }
}

#[when(expr = "{string} gives {int} IDR to campaign {string} as donation {string}")]
async fn donate(world: &mut DonationWorld, donor: String, amount: i64, campaign: String, alias: String) {
    let sys = world.system();
    let request = DonationRequest::new(Rupiah::from(amount), sys.donor_id(&donor), sys.campaign(&campaign).id);
    let result = sys.flow_api().create_donation(request).await;
    let sys = world.system_mut();
    match result {
        Ok(created) => {
            sys.donations.insert(alias, created.donation.order_id);
            world.last_error = None;
        },
        Err(e) => {
            if let donation_engine::DonationFlowError::PaymentInitiationFailed { order_id, .. } = &e {
                sys.donations.insert(alias, order_id.clone());
            }
            world.last_error = Some(flow_error_kind(&e).to_string());
        },
    }
}

#[when(expr = "{string} tries to give {int} IDR to campaign {string}")]
async fn try_donate(world: &mut DonationWorld, donor: String, amount: i64, campaign: String) {
    let sys = world.system();
    let request = DonationRequest::new(Rupiah::from(amount), sys.donor_id(&donor), sys.campaign(&campaign).id);
    let result = sys.flow_api().create_donation(request).await;
    world.last_error = result.err().map(|e| flow_error_kind(&e).to_string());
}

#[when(expr = "the gateway reports {string} for donation {string}")]
async fn gateway_reports(world: &mut DonationWorld, status: String, alias: String) {
    let sys = world.system();
    let n = notification(sys.order_id(&alias), &status, None);
    let result = sys.reconciliation_api().handle_notification(n).await;
    world.last_error = result.err().map(|e| reconciliation_error_kind(&e).to_string());
}

#[when(expr = "the gateway reports {string} with fraud status {string} for donation {string}")]
async fn gateway_reports_with_fraud_status(world: &mut DonationWorld, status: String, fraud: String, alias: String) {
    let sys = world.system();
    let n = notification(sys.order_id(&alias), &status, Some(fraud));
    let result = sys.reconciliation_api().handle_notification(n).await;
    world.last_error = result.err().map(|e| reconciliation_error_kind(&e).to_string());
}

#[when(expr = "the gateway reports {string} for order {string}")]
async fn gateway_reports_for_order(world: &mut DonationWorld, status: String, order_id: String) {
    let n = notification(&OrderId::from(order_id), &status, None);
    let result = world.system().reconciliation_api().handle_notification(n).await;
    world.last_error = result.err().map(|e| reconciliation_error_kind(&e).to_string());
}

#[when(expr = "the gateway reports {string} for donation {string} {int} times at once")]
async fn gateway_reports_concurrently(world: &mut DonationWorld, status: String, alias: String, count: usize) {
    let sys = world.system();
    let order_id = sys.order_id(&alias).clone();
    let apis = (0..count).map(|_| sys.reconciliation_api()).collect::<Vec<_>>();
    let deliveries = apis.iter().map(|api| api.handle_notification(notification(&order_id, &status, None)));
    let results = futures_util::future::join_all(deliveries).await;
    for result in results {
        result.expect("Concurrent delivery failed");
    }
}

#[when(expr = "campaign {string} is deleted")]
async fn delete_campaign(world: &mut DonationWorld, name: String) {
    let sys = world.system();
    sqlx::query("DELETE FROM campaigns WHERE id = $1")
        .bind(sys.campaign(&name).id)
        .execute(sys.db.pool())
        .await
        .expect("Error deleting campaign");
}

#[then(expr = "donation {string} is {word}")]
async fn donation_status(world: &mut DonationWorld, alias: String, status: String) {
    let sys = world.system();
    let expected = status.parse::<DonationStatus>().expect("Not a donation status");
    let donation = sys.db.fetch_donation_by_order_id(sys.order_id(&alias)).await.unwrap().expect("Donation not found");
    assert_eq!(donation.status, expected);
}

#[then(expr = "campaign {string} has collected {int} IDR")]
async fn campaign_collected(world: &mut DonationWorld, name: String, amount: i64) {
    let sys = world.system();
    let campaign = sys.db.fetch_campaign(sys.campaign(&name).id).await.unwrap().expect("Campaign not found");
    assert_eq!(campaign.total_collected, Rupiah::from(amount));
}

#[then(expr = "the collected total of campaign {string} matches its successful donations")]
async fn campaign_total_is_consistent(world: &mut DonationWorld, name: String) {
    let sys = world.system();
    let campaign = sys.db.fetch_campaign(sys.campaign(&name).id).await.unwrap().expect("Campaign not found");
    let donations = sys.db.fetch_donations_for_campaign(campaign.id).await.unwrap();
    let sum = donations.iter().filter(|d| d.status == DonationStatus::Success).map(|d| d.amount).sum::<Rupiah>();
    assert_eq!(campaign.total_collected, sum);
}

#[then(expr = "the request fails with {word}")]
async fn request_fails(world: &mut DonationWorld, kind: String) {
    assert_eq!(world.last_error.as_deref(), Some(kind.as_str()));
}

#[then("the request succeeds")]
async fn request_succeeds(world: &mut DonationWorld) {
    assert!(world.last_error.is_none(), "Unexpected error: {:?}", world.last_error);
}

#[then(expr = "the gateway was asked to charge {string} for {string}")]
async fn gateway_request(world: &mut DonationWorld, name: String, label: String) {
    let request = world.system().gateway.requests().pop().expect("The gateway received no requests");
    assert_eq!(request.customer_name, name);
    assert_eq!(request.item_label, label);
}
