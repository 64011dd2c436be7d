mod donation_world;
mod setups;
mod steps;

pub use donation_world::DonationWorld;
