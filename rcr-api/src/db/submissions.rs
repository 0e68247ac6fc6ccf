//! Submission database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use rcr_common::db::models::{Submission, SubmissionSource, SubmissionStatus};

pub async fn save_submission(pool: &SqlitePool, submission: &Submission) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO submissions (id, contact_id, season, status, source, reporting_exclude, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(submission.id.to_string())
    .bind(&submission.contact_id)
    .bind(submission.season)
    .bind(submission.status.as_str())
    .bind(submission.source.as_str())
    .bind(submission.reporting_exclude)
    .bind(submission.created_at.to_rfc3339())
    .bind(submission.updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn load_submission(pool: &SqlitePool, id: Uuid) -> Result<Option<Submission>> {
    let row = sqlx::query(
        r#"
        SELECT id, contact_id, season, status, source, reporting_exclude, created_at, updated_at
        FROM submissions
        WHERE id = ?
        "#,
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(submission_from_row).transpose()
}

/// Find the submission for one contact and season (at most one exists)
pub async fn find_submission(
    pool: &SqlitePool,
    contact_id: &str,
    season: i64,
) -> Result<Option<Submission>> {
    let row = sqlx::query(
        r#"
        SELECT id, contact_id, season, status, source, reporting_exclude, created_at, updated_at
        FROM submissions
        WHERE contact_id = ? AND season = ?
        "#,
    )
    .bind(contact_id)
    .bind(season)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(submission_from_row).transpose()
}

/// Search submissions by optional contact and season filters
pub async fn search_submissions(
    pool: &SqlitePool,
    contact_id: Option<&str>,
    season: Option<i64>,
) -> Result<Vec<Submission>> {
    let rows = sqlx::query(
        r#"
        SELECT id, contact_id, season, status, source, reporting_exclude, created_at, updated_at
        FROM submissions
        WHERE (? IS NULL OR contact_id = ?)
          AND (? IS NULL OR season = ?)
        ORDER BY season DESC, contact_id
        "#,
    )
    .bind(contact_id)
    .bind(contact_id)
    .bind(season)
    .bind(season)
    .fetch_all(pool)
    .await?;

    rows.iter().map(submission_from_row).collect()
}

pub async fn update_submission(
    pool: &SqlitePool,
    id: Uuid,
    status: SubmissionStatus,
    reporting_exclude: bool,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE submissions
        SET status = ?, reporting_exclude = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(status.as_str())
    .bind(reporting_exclude)
    .bind(Utc::now().to_rfc3339())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a submission; activities and their catches cascade
pub async fn delete_submission(pool: &SqlitePool, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM submissions WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

fn submission_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Submission> {
    let id_str: String = row.get("id");
    let status_str: String = row.get("status");
    let source_str: String = row.get("source");
    let created_str: String = row.get("created_at");
    let updated_str: String = row.get("updated_at");

    Ok(Submission {
        id: Uuid::parse_str(&id_str)?,
        contact_id: row.get("contact_id"),
        season: row.get("season"),
        status: SubmissionStatus::parse(&status_str)
            .ok_or_else(|| anyhow::anyhow!("Unknown submission status: {}", status_str))?,
        source: SubmissionSource::parse(&source_str)
            .ok_or_else(|| anyhow::anyhow!("Unknown submission source: {}", source_str))?,
        reporting_exclude: row.get::<i64, _>("reporting_exclude") != 0,
        created_at: parse_timestamp(&created_str)?,
        updated_at: parse_timestamp(&updated_str)?,
    })
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}
