use sqlx::SqliteConnection;

use crate::db_types::{DonorProfile, NewDonor};

pub async fn fetch_donor(donor_id: i64, conn: &mut SqliteConnection) -> Result<Option<DonorProfile>, sqlx::Error> {
    let donor = sqlx::query_as("SELECT * FROM donors WHERE id = $1").bind(donor_id).fetch_optional(conn).await?;
    Ok(donor)
}

pub async fn insert_donor(donor: NewDonor, conn: &mut SqliteConnection) -> Result<DonorProfile, sqlx::Error> {
    let donor = sqlx::query_as(
        r#"
            INSERT INTO donors (first_name, last_name, username, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(donor.first_name)
    .bind(donor.last_name)
    .bind(donor.username)
    .bind(donor.email)
    .bind(donor.phone)
    .fetch_one(conn)
    .await?;
    Ok(donor)
}
