//! Catch database operations

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use rcr_common::db::models::{Catch, MassType};

use super::submissions::parse_timestamp;

pub async fn save_catch(pool: &SqlitePool, catch: &Catch) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO catches (
            id, activity_id, date_caught, species_id, method_id,
            mass_type, mass_kg, mass_oz, released,
            only_month_recorded, no_date_recorded, reporting_exclude,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(catch.id.to_string())
    .bind(catch.activity_id.to_string())
    .bind(catch.date_caught.to_string())
    .bind(catch.species_id.to_string())
    .bind(catch.method_id.to_string())
    .bind(catch.mass_type.as_str())
    .bind(catch.mass_kg)
    .bind(catch.mass_oz)
    .bind(catch.released)
    .bind(catch.only_month_recorded)
    .bind(catch.no_date_recorded)
    .bind(catch.reporting_exclude)
    .bind(catch.created_at.to_rfc3339())
    .bind(catch.updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn load_catch(pool: &SqlitePool, id: Uuid) -> Result<Option<Catch>> {
    let row = sqlx::query("SELECT * FROM catches WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(catch_from_row).transpose()
}

pub async fn list_catches_for_activity(pool: &SqlitePool, activity_id: Uuid) -> Result<Vec<Catch>> {
    let rows = sqlx::query("SELECT * FROM catches WHERE activity_id = ? ORDER BY date_caught")
        .bind(activity_id.to_string())
        .fetch_all(pool)
        .await?;

    rows.iter().map(catch_from_row).collect()
}

pub async fn delete_catch(pool: &SqlitePool, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM catches WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

fn catch_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Catch> {
    let id_str: String = row.get("id");
    let activity_str: String = row.get("activity_id");
    let date_str: String = row.get("date_caught");
    let species_str: String = row.get("species_id");
    let method_str: String = row.get("method_id");
    let mass_type_str: String = row.get("mass_type");
    let created_str: String = row.get("created_at");
    let updated_str: String = row.get("updated_at");

    Ok(Catch {
        id: Uuid::parse_str(&id_str)?,
        activity_id: Uuid::parse_str(&activity_str)?,
        date_caught: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")?,
        species_id: Uuid::parse_str(&species_str)?,
        method_id: Uuid::parse_str(&method_str)?,
        mass_type: MassType::parse(&mass_type_str)
            .ok_or_else(|| anyhow::anyhow!("Unknown mass type: {}", mass_type_str))?,
        mass_kg: row.get("mass_kg"),
        mass_oz: row.get("mass_oz"),
        released: row.get::<i64, _>("released") != 0,
        only_month_recorded: row.get::<i64, _>("only_month_recorded") != 0,
        no_date_recorded: row.get::<i64, _>("no_date_recorded") != 0,
        reporting_exclude: row.get::<i64, _>("reporting_exclude") != 0,
        created_at: parse_timestamp(&created_str)?,
        updated_at: parse_timestamp(&updated_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rcr_common::db::init::init_in_memory;
    use rcr_common::db::models::{Activity, Submission, SubmissionSource, SubmissionStatus};

    async fn seeded_activity(pool: &SqlitePool) -> Activity {
        let submission = Submission {
            id: Uuid::new_v4(),
            contact_id: "contact-1".to_string(),
            season: 2024,
            status: SubmissionStatus::Incomplete,
            source: SubmissionSource::Web,
            reporting_exclude: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        crate::db::submissions::save_submission(pool, &submission).await.unwrap();

        let activity = Activity {
            id: Uuid::new_v4(),
            submission_id: submission.id,
            river_id: Uuid::parse_str("30000000-0000-0000-0000-000000000003").unwrap(),
            days_fished_with_mandatory_release: 2,
            days_fished_other: 3,
        };
        crate::db::activities::save_activity(pool, &activity).await.unwrap();
        activity
    }

    #[tokio::test]
    async fn test_save_and_load_catch() {
        let pool = init_in_memory().await.unwrap();
        let activity = seeded_activity(&pool).await;

        let catch = Catch {
            id: Uuid::new_v4(),
            activity_id: activity.id,
            date_caught: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            species_id: Uuid::parse_str("10000000-0000-0000-0000-000000000001").unwrap(),
            method_id: Uuid::parse_str("20000000-0000-0000-0000-000000000001").unwrap(),
            mass_type: MassType::Metric,
            mass_kg: 4.5,
            mass_oz: 158.73,
            released: true,
            only_month_recorded: false,
            no_date_recorded: false,
            reporting_exclude: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        save_catch(&pool, &catch).await.unwrap();

        let loaded = load_catch(&pool, catch.id).await.unwrap().unwrap();
        assert_eq!(loaded.date_caught, catch.date_caught);
        assert_eq!(loaded.mass_type, MassType::Metric);
        assert!(loaded.released);

        let listed = list_catches_for_activity(&pool, activity.id).await.unwrap();
        assert_eq!(listed.len(), 1);
    }
}
