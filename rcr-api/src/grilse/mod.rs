//! Grilse probability pipeline
//!
//! Handles uploaded weight-by-month probability spreadsheets: parse,
//! validate (collecting every error before failing), transform into
//! records, and reconcile against stored data for the season and gate.

pub mod export;
pub mod parser;
pub mod transform;
pub mod validate;

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::db;

pub use export::{export_csv, GrilseReportRow, EXPORT_HEADER};
pub use parser::{parse_csv, CsvGrid};
pub use transform::transform_probabilities;
pub use validate::{validate_grid, CsvError, CsvErrorKind};

/// Fixed message for the overwrite-not-set conflict
pub const CONFLICT_MESSAGE: &str =
    "Existing data found for the given season and gate but overwrite parameter not set";

/// Failures the upload pipeline can report to the caller.
///
/// The first three are expected, recoverable-by-the-caller conditions;
/// `Database` is an infrastructure failure surfaced as a generic error.
#[derive(Debug, Error)]
pub enum GrilseError {
    /// Body was empty, not UTF-8, or not parseable as CSV (422)
    #[error("File is empty or not a valid csv.")]
    EmptyOrInvalidFile,

    /// The CSV parsed but failed validation; carries every violation (400)
    #[error("Invalid CSV data")]
    Validation(Vec<CsvError>),

    /// Data already stored for the season and gate, overwrite not set (409)
    #[error("{}", CONFLICT_MESSAGE)]
    Conflict,

    /// Storage failure (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of a successful upload
#[derive(Debug, Clone, Copy)]
pub struct UploadOutcome {
    /// Number of probability records written (zero is a valid outcome)
    pub records_written: u64,
}

/// Run the full upload pipeline for one season and gate.
///
/// Existing data blocks the write unless `overwrite` is set; with it set,
/// delete and insert run in one transaction so a failed insert can never
/// leave the season/gate half-replaced.
pub async fn upload_probabilities(
    pool: &SqlitePool,
    season: i64,
    gate_id: i64,
    raw: &[u8],
    overwrite: bool,
) -> Result<UploadOutcome, GrilseError> {
    let grid = parse_csv(raw)?;
    validate_grid(&grid).map_err(GrilseError::Validation)?;

    if db::grilse::exists_for_season_and_gate(pool, season, gate_id).await? && !overwrite {
        return Err(GrilseError::Conflict);
    }

    let records = transform_probabilities(&grid, season, gate_id);
    let records_written = db::grilse::replace_for_season_and_gate(pool, season, gate_id, &records).await?;

    info!(
        season,
        gate_id,
        records = records_written,
        "Grilse probabilities replaced"
    );

    Ok(UploadOutcome { records_written })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcr_common::db::init::init_in_memory;

    const VALID_CSV: &[u8] = b"Weight,January,February\n10,0.2,0.3\n15,0.5,0.6";

    #[tokio::test]
    async fn test_upload_writes_records() {
        let pool = init_in_memory().await.unwrap();

        let outcome = upload_probabilities(&pool, 2024, 1, VALID_CSV, false)
            .await
            .unwrap();
        assert_eq!(outcome.records_written, 4);

        let stored: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM grilse_probabilities WHERE season = 2024 AND gate_id = 1",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(stored, 4);
    }

    #[tokio::test]
    async fn test_second_upload_without_overwrite_conflicts() {
        let pool = init_in_memory().await.unwrap();

        upload_probabilities(&pool, 2024, 1, VALID_CSV, false).await.unwrap();
        let err = upload_probabilities(&pool, 2024, 1, VALID_CSV, false)
            .await
            .unwrap_err();
        assert!(matches!(err, GrilseError::Conflict));
        assert_eq!(err.to_string(), CONFLICT_MESSAGE);

        // No deletion happened in the conflict branch
        let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM grilse_probabilities")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, 4);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_existing() {
        let pool = init_in_memory().await.unwrap();

        upload_probabilities(&pool, 2024, 1, VALID_CSV, false).await.unwrap();
        let outcome =
            upload_probabilities(&pool, 2024, 1, b"Weight,June\n8,0.9", true)
                .await
                .unwrap();
        assert_eq!(outcome.records_written, 1);

        let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM grilse_probabilities")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, 1);
    }

    #[tokio::test]
    async fn test_same_season_different_gate_is_not_a_conflict() {
        let pool = init_in_memory().await.unwrap();

        upload_probabilities(&pool, 2024, 1, VALID_CSV, false).await.unwrap();
        let outcome = upload_probabilities(&pool, 2024, 2, VALID_CSV, false)
            .await
            .unwrap();
        assert_eq!(outcome.records_written, 4);
    }

    #[tokio::test]
    async fn test_all_zero_probabilities_still_succeed() {
        let pool = init_in_memory().await.unwrap();

        let outcome = upload_probabilities(&pool, 2024, 1, b"Weight,January\n10,0", false)
            .await
            .unwrap();
        assert_eq!(outcome.records_written, 0);

        // Zero records written is success, not a conflict for the next upload
        let outcome = upload_probabilities(&pool, 2024, 1, b"Weight,January\n10,0.5", false)
            .await
            .unwrap();
        assert_eq!(outcome.records_written, 1);
    }

    #[tokio::test]
    async fn test_validation_failure_reports_all_errors() {
        let pool = init_in_memory().await.unwrap();

        let err = upload_probabilities(
            &pool,
            2024,
            1,
            b"Weight,January\n1.5,0.2\n3,0.4\n3,2.0",
            false,
        )
        .await
        .unwrap_err();

        match err {
            GrilseError::Validation(errors) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_body_rejected_before_storage_is_touched() {
        let pool = init_in_memory().await.unwrap();

        let err = upload_probabilities(&pool, 2024, 1, b"", false).await.unwrap_err();
        assert!(matches!(err, GrilseError::EmptyOrInvalidFile));
    }
}
