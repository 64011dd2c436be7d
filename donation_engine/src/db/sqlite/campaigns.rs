use donor_common::Rupiah;
use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{Campaign, NewCampaign};

pub async fn fetch_campaign(campaign_id: i64, conn: &mut SqliteConnection) -> Result<Option<Campaign>, sqlx::Error> {
    let campaign =
        sqlx::query_as("SELECT * FROM campaigns WHERE id = $1").bind(campaign_id).fetch_optional(conn).await?;
    Ok(campaign)
}

pub async fn insert_campaign(campaign: NewCampaign, conn: &mut SqliteConnection) -> Result<Campaign, sqlx::Error> {
    let campaign: Campaign =
        sqlx::query_as("INSERT INTO campaigns (title, owner_id, target_total) VALUES ($1, $2, $3) RETURNING *;")
            .bind(campaign.title)
            .bind(campaign.owner_id)
            .bind(campaign.target_total.value())
            .fetch_one(conn)
            .await?;
    debug!("🗃️ Campaign #{} '{}' inserted", campaign.id, campaign.title);
    Ok(campaign)
}

/// Adds `amount` to the campaign's collected total in a single statement, so the read and the write cannot interleave
/// with another writer. Returns `None` if the campaign does not exist.
pub async fn add_to_total(
    campaign_id: i64,
    amount: Rupiah,
    conn: &mut SqliteConnection,
) -> Result<Option<Campaign>, sqlx::Error> {
    let campaign: Option<Campaign> = sqlx::query_as(
        r#"
            UPDATE campaigns SET
                total_collected = total_collected + $1,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            RETURNING *;
        "#,
    )
    .bind(amount.value())
    .bind(campaign_id)
    .fetch_optional(conn)
    .await?;
    if let Some(c) = &campaign {
        debug!("🗃️ Campaign #{campaign_id} total increased by {amount} to {}", c.total_collected);
    }
    Ok(campaign)
}
