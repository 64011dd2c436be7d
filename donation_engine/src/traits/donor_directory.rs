use crate::{
    db_types::{DonorProfile, NewDonor},
    traits::DonationStoreError,
};

/// Donor contact details are owned by the user service. The engine only reads them to fill in the customer details of
/// a payment session.
#[allow(async_fn_in_trait)]
pub trait DonorDirectory {
    async fn fetch_donor_profile(&self, donor_id: i64) -> Result<Option<DonorProfile>, DonationStoreError>;

    /// For seeding and tests.
    async fn insert_donor(&self, donor: NewDonor) -> Result<DonorProfile, DonationStoreError>;
}
