//! Activity database operations

use anyhow::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use rcr_common::db::models::Activity;

pub async fn save_activity(pool: &SqlitePool, activity: &Activity) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO activities (id, submission_id, river_id, days_fished_with_mandatory_release, days_fished_other)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(activity.id.to_string())
    .bind(activity.submission_id.to_string())
    .bind(activity.river_id.to_string())
    .bind(activity.days_fished_with_mandatory_release)
    .bind(activity.days_fished_other)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn load_activity(pool: &SqlitePool, id: Uuid) -> Result<Option<Activity>> {
    let row = sqlx::query(
        r#"
        SELECT id, submission_id, river_id, days_fished_with_mandatory_release, days_fished_other
        FROM activities
        WHERE id = ?
        "#,
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(activity_from_row).transpose()
}

pub async fn list_activities_for_submission(
    pool: &SqlitePool,
    submission_id: Uuid,
) -> Result<Vec<Activity>> {
    let rows = sqlx::query(
        r#"
        SELECT id, submission_id, river_id, days_fished_with_mandatory_release, days_fished_other
        FROM activities
        WHERE submission_id = ?
        ORDER BY river_id
        "#,
    )
    .bind(submission_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(activity_from_row).collect()
}

/// True if the submission already records activity on the river
pub async fn river_already_recorded(
    pool: &SqlitePool,
    submission_id: Uuid,
    river_id: Uuid,
) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM activities WHERE submission_id = ? AND river_id = ?",
    )
    .bind(submission_id.to_string())
    .bind(river_id.to_string())
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

pub async fn delete_activity(pool: &SqlitePool, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM activities WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

fn activity_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Activity> {
    let id_str: String = row.get("id");
    let submission_str: String = row.get("submission_id");
    let river_str: String = row.get("river_id");

    Ok(Activity {
        id: Uuid::parse_str(&id_str)?,
        submission_id: Uuid::parse_str(&submission_str)?,
        river_id: Uuid::parse_str(&river_str)?,
        days_fished_with_mandatory_release: row.get("days_fished_with_mandatory_release"),
        days_fished_other: row.get("days_fished_other"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rcr_common::db::init::init_in_memory;
    use rcr_common::db::models::{Submission, SubmissionSource, SubmissionStatus};

    async fn seeded_submission(pool: &SqlitePool) -> Submission {
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
        submission
    }

    fn seeded_river() -> Uuid {
        Uuid::parse_str("30000000-0000-0000-0000-000000000003").unwrap() // Tyne
    }

    #[tokio::test]
    async fn test_save_load_delete() {
        let pool = init_in_memory().await.unwrap();
        let submission = seeded_submission(&pool).await;

        let activity = Activity {
            id: Uuid::new_v4(),
            submission_id: submission.id,
            river_id: seeded_river(),
            days_fished_with_mandatory_release: 5,
            days_fished_other: 10,
        };
        save_activity(&pool, &activity).await.unwrap();

        let loaded = load_activity(&pool, activity.id).await.unwrap().unwrap();
        assert_eq!(loaded.days_fished_other, 10);

        assert!(river_already_recorded(&pool, submission.id, seeded_river()).await.unwrap());

        assert_eq!(delete_activity(&pool, activity.id).await.unwrap(), 1);
        assert!(load_activity(&pool, activity.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_submission_cascades() {
        let pool = init_in_memory().await.unwrap();
        let submission = seeded_submission(&pool).await;

        let activity = Activity {
            id: Uuid::new_v4(),
            submission_id: submission.id,
            river_id: seeded_river(),
            days_fished_with_mandatory_release: 0,
            days_fished_other: 1,
        };
        save_activity(&pool, &activity).await.unwrap();

        crate::db::submissions::delete_submission(&pool, submission.id).await.unwrap();
        assert!(load_activity(&pool, activity.id).await.unwrap().is_none());
    }
}
