//! Wiring between the reconciler and the code that wants to hear about confirmed donations.
//!
//! Register callbacks on [`EventHooks`], turn them into [`EventHandlers`], and hand the [`EventProducers`] to the
//! [`crate::ReconciliationApi`]. Only committed confirmations are ever published, so a subscriber sees each donation at
//! most once.
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;

use crate::{
    db_types::{Campaign, Donation},
    events::{DonationConfirmedEvent, EventHandler, EventProducer, Handler},
};

#[derive(Default, Clone)]
pub struct EventProducers {
    donation_confirmed: Vec<EventProducer<DonationConfirmedEvent>>,
}

impl EventProducers {
    pub fn has_subscribers(&self) -> bool {
        !self.donation_confirmed.is_empty()
    }

    /// Sends the confirmation to every subscriber. The campaign must already include the donation in its total.
    pub async fn publish_donation_confirmed(&self, donation: &Donation, campaign: &Campaign) {
        for producer in &self.donation_confirmed {
            trace!("📬️ Publishing confirmation of donation [{}]", donation.order_id);
            producer.publish_event(DonationConfirmedEvent::new(donation.clone(), campaign.clone())).await;
        }
    }
}

pub struct EventHandlers {
    on_donation_confirmed: Option<EventHandler<DonationConfirmedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_donation_confirmed = hooks.on_donation_confirmed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_donation_confirmed }
    }

    pub fn producers(&self) -> EventProducers {
        let donation_confirmed = self.on_donation_confirmed.iter().map(EventHandler::subscribe).collect();
        EventProducers { donation_confirmed }
    }

    /// Spawns the listener tasks. Each one ends once every [`EventProducers`] handed out by
    /// [`producers`](Self::producers) has been dropped.
    pub async fn start_handlers(self) {
        match self.on_donation_confirmed {
            Some(handler) => {
                tokio::spawn(handler.start_handler());
            },
            None => debug!("📬️ Nobody is listening for donation confirmations"),
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    on_donation_confirmed: Option<Handler<DonationConfirmedEvent>>,
}

impl EventHooks {
    /// Called after a donation first moves into `success` and its amount has been added to the campaign.
    pub fn on_donation_confirmed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(DonationConfirmedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_donation_confirmed = Some(Arc::new(f));
        self
    }
}
