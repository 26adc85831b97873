use anyhow::Result;
use sqlx::PgPool;

use crate::domain::{NewReading, OwnerId, Reading};

/// Fetch every reading belonging to `owner`, oldest first.
///
/// Rows without a date sort ahead of dated rows.
pub async fn readings_for_owner(pool: &PgPool, owner: &OwnerId) -> Result<Vec<Reading>> {
    let rows = sqlx::query_as::<_, Reading>(
        r#"
        SELECT
            id,
            owner_id,
            date,
            appliance_name,
            units,
            cost_per_unit,
            total_cost
        FROM readings
        WHERE owner_id = $1
        ORDER BY date ASC NULLS FIRST, id ASC
        "#,
    )
    .bind(owner)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Insert a reading for `owner` and return the stored row.
///
/// `total_cost` is resolved here and written once; later reads never
/// recompute it.
pub async fn insert_reading(pool: &PgPool, owner: &OwnerId, reading: &NewReading) -> Result<Reading> {
    let row = sqlx::query_as::<_, Reading>(
        r#"
        INSERT INTO readings (owner_id, date, appliance_name, units, cost_per_unit, total_cost)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING
            id,
            owner_id,
            date,
            appliance_name,
            units,
            cost_per_unit,
            total_cost
        "#,
    )
    .bind(owner)
    .bind(reading.date)
    .bind(&reading.appliance_name)
    .bind(reading.units)
    .bind(reading.cost_per_unit)
    .bind(reading.resolved_total_cost())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Cheap round trip used by health checks.
pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
