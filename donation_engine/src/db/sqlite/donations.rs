use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{Donation, DonationStatus, DonationSummary, NewDonation, OrderId},
    traits::{DonationStoreError, StatusUpdate},
};

/// Inserts a new `pending` donation. A clash on the order id is reported as
/// [`DonationStoreError::DonationAlreadyExists`].
pub async fn insert_donation(
    donation: NewDonation,
    conn: &mut SqliteConnection,
) -> Result<Donation, DonationStoreError> {
    if !donation.amount.is_positive() {
        return Err(DonationStoreError::InvalidAmount(donation.amount));
    }
    let order_id = donation.order_id.clone();
    let donation: Donation = sqlx::query_as(
        r#"
            INSERT INTO donations (order_id, campaign_id, donor_id, amount, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(donation.order_id.as_str())
    .bind(donation.campaign_id)
    .bind(donation.donor_id)
    .bind(donation.amount.value())
    .bind(DonationStatus::Pending)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref err) if err.is_unique_violation() => {
            DonationStoreError::DonationAlreadyExists(order_id.clone())
        },
        e => DonationStoreError::from(e),
    })?;
    debug!("🗃️ Donation [{}] inserted with id {}", donation.order_id, donation.id);
    Ok(donation)
}

pub async fn fetch_donation(id: i64, conn: &mut SqliteConnection) -> Result<Option<Donation>, sqlx::Error> {
    let donation = sqlx::query_as("SELECT * FROM donations WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(donation)
}

pub async fn fetch_donation_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Donation>, sqlx::Error> {
    let donation = sqlx::query_as("SELECT * FROM donations WHERE order_id = $1")
        .bind(order_id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(donation)
}

pub async fn fetch_donations_for_campaign(
    campaign_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Donation>, sqlx::Error> {
    let donations = sqlx::query_as("SELECT * FROM donations WHERE campaign_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(campaign_id)
        .fetch_all(conn)
        .await?;
    Ok(donations)
}

pub async fn fetch_donations_for_donor(donor_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Donation>, sqlx::Error> {
    let donations = sqlx::query_as("SELECT * FROM donations WHERE donor_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(donor_id)
        .fetch_all(conn)
        .await?;
    Ok(donations)
}

/// Sets the payment URL and token, unless they have been set already.
pub async fn attach_payment_session(
    order_id: &OrderId,
    payment_url: &str,
    token: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Donation>, sqlx::Error> {
    let donation = sqlx::query_as(
        r#"
            UPDATE donations SET
                payment_url = COALESCE(payment_url, $1),
                payment_token = COALESCE(payment_token, $2),
                updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $3
            RETURNING *;
        "#,
    )
    .bind(payment_url)
    .bind(token)
    .bind(order_id.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(donation)
}

/// Moves the donation from `pending` to `failed`. Returns `None` if the donation does not exist or is not `pending`.
pub async fn fail_pending_donation(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Donation>, sqlx::Error> {
    let donation = sqlx::query_as(
        r#"
            UPDATE donations SET status = $1, updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $2 AND status = $3
            RETURNING *;
        "#,
    )
    .bind(DonationStatus::Failed)
    .bind(order_id.as_str())
    .bind(DonationStatus::Pending)
    .fetch_optional(conn)
    .await?;
    Ok(donation)
}

/// The compare-and-set at the heart of reconciliation.
///
/// The status only changes if the transition is allowed from the donation's current status:
/// `pending` and `unknown` go anywhere. `success` and `failed` are terminal. A transition to the status the donation
/// already has is not a change.
///
/// Returns the updated donation, or `None` if no row was changed. Being a write, this statement takes the database
/// write lock, so when it is the first statement in a transaction, concurrent reconciliations of the same donation
/// are serialised.
pub async fn try_transition(
    order_id: &OrderId,
    update: &StatusUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Donation>, sqlx::Error> {
    let donation: Option<Donation> = sqlx::query_as(
        r#"
            UPDATE donations SET
                status = $1,
                payment_method = COALESCE(payment_method, $2),
                provider_status = COALESCE($3, provider_status),
                updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $4
              AND status <> $5
              AND status IN ('pending', 'unknown')
            RETURNING *;
        "#,
    )
    .bind(update.status)
    .bind(update.payment_method.as_deref())
    .bind(update.provider_status.as_deref())
    .bind(order_id.as_str())
    .bind(update.status)
    .fetch_optional(conn)
    .await?;
    if let Some(d) = &donation {
        trace!("🗃️ Donation [{order_id}] is now {}", d.status);
    }
    Ok(donation)
}

/// Records the payment method (first one wins) and the latest provider status without touching the donation status.
pub async fn record_provider_report(
    order_id: &OrderId,
    update: &StatusUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Donation>, sqlx::Error> {
    let donation = sqlx::query_as(
        r#"
            UPDATE donations SET
                payment_method = COALESCE(payment_method, $1),
                provider_status = COALESCE($2, provider_status),
                updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $3
            RETURNING *;
        "#,
    )
    .bind(update.payment_method.as_deref())
    .bind(update.provider_status.as_deref())
    .bind(order_id.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(donation)
}

/// Count and sum of the `success` donations, optionally restricted to a single campaign.
pub async fn donation_summary(
    campaign_id: Option<i64>,
    conn: &mut SqliteConnection,
) -> Result<DonationSummary, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        "SELECT COUNT(*) AS total_transactions, COALESCE(SUM(amount), 0) AS total_amount FROM donations WHERE status = ",
    );
    builder.push_bind(DonationStatus::Success);
    if let Some(id) = campaign_id {
        builder.push(" AND campaign_id = ");
        builder.push_bind(id);
    }
    trace!("🗃️ Executing query: {}", builder.sql());
    let summary = builder.build_query_as::<DonationSummary>().fetch_one(conn).await?;
    Ok(summary)
}
