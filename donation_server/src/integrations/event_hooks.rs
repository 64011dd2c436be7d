use donation_engine::events::{DonationConfirmedEvent, EventHandlers, EventHooks};
use log::*;

pub const EVENT_BUFFER_SIZE: usize = 25;

/// Hooks the server attaches to engine events.
///
/// Confirmed donations are logged, along with a note when the donation has taken its campaign to (or past) its
/// target.
pub fn create_event_handlers() -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks.on_donation_confirmed(|ev| {
        Box::pin(async move {
            log_confirmation(&ev);
        })
    });
    EventHandlers::new(EVENT_BUFFER_SIZE, hooks)
}

fn log_confirmation(ev: &DonationConfirmedEvent) {
    let DonationConfirmedEvent { donation, campaign } = ev;
    info!(
        "🧾️ Donation [{}] of {} to campaign #{} ({}) is confirmed. Campaign total is now {}",
        donation.order_id, donation.amount, campaign.id, campaign.title, campaign.total_collected
    );
    if campaign.has_reached_target() {
        info!("🧾️ Campaign #{} has reached its target of {}", campaign.id, campaign.target_total);
    }
}
