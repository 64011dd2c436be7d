use cucumber::given;
use donation_engine::{
    db_types::{NewCampaign, NewDonor},
    traits::GatewayError,
    CampaignManagement,
    DonorDirectory,
};
use donor_common::Rupiah;

use crate::cucumber::{donation_world::DonationSystem, DonationWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut DonationWorld) {
    let system = DonationSystem::new().await;
    world.system = Some(system);
}

#[given(expr = "a campaign {string} with a target of {int} IDR")]
async fn campaign_with_target(world: &mut DonationWorld, name: String, target: i64) {
    let sys = world.system_mut();
    let new_campaign = NewCampaign::new(name.as_str(), 1, Rupiah::from(target));
    let campaign = sys.db.insert_campaign(new_campaign).await.expect("Error creating campaign");
    sys.campaigns.insert(name, campaign);
}

#[given(expr = "campaign {string} has already collected {int} IDR")]
async fn campaign_has_collected(world: &mut DonationWorld, name: String, amount: i64) {
    let sys = world.system_mut();
    let id = sys.campaign(&name).id;
    let campaign = sys.db.add_to_total(id, Rupiah::from(amount)).await.expect("Error adding to campaign total");
    sys.campaigns.insert(name, campaign);
}

#[given(expr = "a donor {string} with email {string}")]
async fn donor_with_email(world: &mut DonationWorld, name: String, email: String) {
    let sys = world.system_mut();
    let donor = NewDonor { first_name: name.clone(), email, ..Default::default() };
    let donor = sys.db.insert_donor(donor).await.expect("Error creating donor");
    sys.donors.insert(name, donor.id);
}

#[given("the payment gateway is down")]
async fn gateway_is_down(world: &mut DonationWorld) {
    world.system().gateway.fail_with(GatewayError::Timeout);
}
