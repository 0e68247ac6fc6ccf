//! Grilse probability storage gateway
//!
//! Records are replaced wholesale by season and gate: delete-then-insert
//! inside a single transaction, never mutation in place.

use sqlx::SqlitePool;

use rcr_common::db::models::GrilseProbability;

use crate::grilse::GrilseReportRow;

/// True if any probability record is stored for the season and gate
pub async fn exists_for_season_and_gate(
    pool: &SqlitePool,
    season: i64,
    gate_id: i64,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM grilse_probabilities WHERE season = ? AND gate_id = ?",
    )
    .bind(season)
    .bind(gate_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Delete all probability records for the season and gate, returning the
/// number removed
pub async fn delete_for_season_and_gate(
    pool: &SqlitePool,
    season: i64,
    gate_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM grilse_probabilities WHERE season = ? AND gate_id = ?")
        .bind(season)
        .bind(gate_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Atomically replace the stored records for the season and gate.
///
/// Delete and bulk-insert share one transaction: if any insert fails the
/// delete rolls back, so the season/gate is never left partially replaced.
/// Returns the number of records inserted.
pub async fn replace_for_season_and_gate(
    pool: &SqlitePool,
    season: i64,
    gate_id: i64,
    records: &[GrilseProbability],
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM grilse_probabilities WHERE season = ? AND gate_id = ?")
        .bind(season)
        .bind(gate_id)
        .execute(&mut *tx)
        .await?;

    for record in records {
        sqlx::query(
            r#"
            INSERT INTO grilse_probabilities (id, season, gate_id, month, mass_lbs, probability, version)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.season)
        .bind(record.gate_id)
        .bind(record.month as i64)
        .bind(record.mass_lbs)
        .bind(&record.probability)
        .bind(record.version.to_rfc3339())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(records.len() as u64)
}

/// Load report rows for an inclusive season range, joined with the gate's
/// display name for the export
pub async fn fetch_report_rows(
    pool: &SqlitePool,
    season_start: i64,
    season_end: i64,
) -> Result<Vec<GrilseReportRow>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i64, Option<String>, i64, i64, String)>(
        r#"
        SELECT p.season, g.name, p.month, p.mass_lbs, p.probability
        FROM grilse_probabilities p
        LEFT JOIN grilse_weight_gates g ON g.id = p.gate_id
        WHERE p.season BETWEEN ? AND ?
        ORDER BY p.season, p.gate_id, p.mass_lbs, p.month
        "#,
    )
    .bind(season_start)
    .bind(season_end)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(season, gate_name, month, mass_lbs, probability)| GrilseReportRow {
            season,
            gate_name,
            month: month as u32,
            mass_lbs,
            probability,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rcr_common::db::init::init_in_memory;
    use uuid::Uuid;

    fn record(season: i64, gate_id: i64, month: u32, mass_lbs: i64, probability: &str) -> GrilseProbability {
        GrilseProbability {
            id: Uuid::new_v4(),
            season,
            gate_id,
            month,
            mass_lbs,
            probability: probability.to_string(),
            version: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_exists_and_delete() {
        let pool = init_in_memory().await.unwrap();

        assert!(!exists_for_season_and_gate(&pool, 2024, 1).await.unwrap());

        replace_for_season_and_gate(&pool, 2024, 1, &[record(2024, 1, 1, 10, "0.2")])
            .await
            .unwrap();
        assert!(exists_for_season_and_gate(&pool, 2024, 1).await.unwrap());
        assert!(!exists_for_season_and_gate(&pool, 2023, 1).await.unwrap());

        let removed = delete_for_season_and_gate(&pool, 2024, 1).await.unwrap();
        assert_eq!(removed, 1);
        assert!(!exists_for_season_and_gate(&pool, 2024, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_only_touches_its_own_season_and_gate() {
        let pool = init_in_memory().await.unwrap();

        replace_for_season_and_gate(&pool, 2023, 1, &[record(2023, 1, 1, 10, "0.2")])
            .await
            .unwrap();
        replace_for_season_and_gate(&pool, 2024, 1, &[record(2024, 1, 1, 10, "0.4")])
            .await
            .unwrap();
        replace_for_season_and_gate(&pool, 2024, 1, &[record(2024, 1, 2, 12, "0.6")])
            .await
            .unwrap();

        let rows = fetch_report_rows(&pool, 2023, 2024).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].season, 2023);
        assert_eq!(rows[1].season, 2024);
        assert_eq!(rows[1].probability, "0.6");
    }

    #[tokio::test]
    async fn test_report_rows_join_gate_names() {
        let pool = init_in_memory().await.unwrap();

        // Gate 1 is seeded as 'Dee'; gate 99 has no reference row
        sqlx::query("PRAGMA foreign_keys = OFF").execute(&pool).await.unwrap();
        replace_for_season_and_gate(&pool, 2024, 1, &[record(2024, 1, 1, 10, "0.2")])
            .await
            .unwrap();
        replace_for_season_and_gate(&pool, 2024, 99, &[record(2024, 99, 1, 10, "0.3")])
            .await
            .unwrap();

        let rows = fetch_report_rows(&pool, 2024, 2024).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].gate_name.as_deref(), Some("Dee"));
        assert_eq!(rows[1].gate_name, None);
    }

    #[tokio::test]
    async fn test_report_rows_ordered_by_mass_then_month() {
        let pool = init_in_memory().await.unwrap();

        let records = vec![
            record(2024, 1, 2, 12, "0.4"),
            record(2024, 1, 1, 12, "0.3"),
            record(2024, 1, 1, 10, "0.1"),
        ];
        replace_for_season_and_gate(&pool, 2024, 1, &records).await.unwrap();

        let rows = fetch_report_rows(&pool, 2024, 2024).await.unwrap();
        let shape: Vec<(i64, u32)> = rows.iter().map(|r| (r.mass_lbs, r.month)).collect();
        assert_eq!(shape, vec![(10, 1), (12, 1), (12, 2)]);
    }
}
