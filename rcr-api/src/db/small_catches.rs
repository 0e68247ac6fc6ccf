//! Small catch database operations

use anyhow::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use rcr_common::db::models::SmallCatch;

use super::submissions::parse_timestamp;

pub async fn save_small_catch(pool: &SqlitePool, small_catch: &SmallCatch) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO small_catches (
            id, activity_id, month, fly_count, spinner_count, bait_count,
            unknown_count, released, reporting_exclude, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(small_catch.id.to_string())
    .bind(small_catch.activity_id.to_string())
    .bind(small_catch.month as i64)
    .bind(small_catch.fly_count)
    .bind(small_catch.spinner_count)
    .bind(small_catch.bait_count)
    .bind(small_catch.unknown_count)
    .bind(small_catch.released)
    .bind(small_catch.reporting_exclude)
    .bind(small_catch.created_at.to_rfc3339())
    .bind(small_catch.updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn load_small_catch(pool: &SqlitePool, id: Uuid) -> Result<Option<SmallCatch>> {
    let row = sqlx::query("SELECT * FROM small_catches WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(small_catch_from_row).transpose()
}

pub async fn list_small_catches_for_activity(
    pool: &SqlitePool,
    activity_id: Uuid,
) -> Result<Vec<SmallCatch>> {
    let rows = sqlx::query("SELECT * FROM small_catches WHERE activity_id = ? ORDER BY month")
        .bind(activity_id.to_string())
        .fetch_all(pool)
        .await?;

    rows.iter().map(small_catch_from_row).collect()
}

/// True if the activity already records small catches for the month
pub async fn month_already_recorded(
    pool: &SqlitePool,
    activity_id: Uuid,
    month: u32,
) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM small_catches WHERE activity_id = ? AND month = ?",
    )
    .bind(activity_id.to_string())
    .bind(month as i64)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

pub async fn delete_small_catch(pool: &SqlitePool, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM small_catches WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

fn small_catch_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SmallCatch> {
    let id_str: String = row.get("id");
    let activity_str: String = row.get("activity_id");
    let created_str: String = row.get("created_at");
    let updated_str: String = row.get("updated_at");

    Ok(SmallCatch {
        id: Uuid::parse_str(&id_str)?,
        activity_id: Uuid::parse_str(&activity_str)?,
        month: row.get::<i64, _>("month") as u32,
        fly_count: row.get("fly_count"),
        spinner_count: row.get("spinner_count"),
        bait_count: row.get("bait_count"),
        unknown_count: row.get("unknown_count"),
        released: row.get("released"),
        reporting_exclude: row.get::<i64, _>("reporting_exclude") != 0,
        created_at: parse_timestamp(&created_str)?,
        updated_at: parse_timestamp(&updated_str)?,
    })
}
