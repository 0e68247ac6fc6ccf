//! Database initialization
//!
//! Creates the SQLite database on first run and brings the schema up to
//! date. All helpers are idempotent (`CREATE TABLE IF NOT EXISTS` /
//! `INSERT OR IGNORE`) and safe to call on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_pragmas(&pool).await?;
    create_all_tables(&pool).await?;
    seed_reference_data(&pool).await?;

    Ok(pool)
}

/// Create an in-memory database with the full schema and seed data.
/// Intended for tests.
///
/// Limited to one connection: SQLite in-memory databases are
/// per-connection, and pragmas like foreign_keys don't cross connections.
pub async fn init_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    configure_pragmas(&pool).await?;
    create_all_tables(&pool).await?;
    seed_reference_data(&pool).await?;
    Ok(pool)
}

async fn configure_pragmas(pool: &SqlitePool) -> Result<()> {
    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    // Wait rather than fail on short-lived write locks
    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;

    Ok(())
}

/// Create every table in dependency order
pub async fn create_all_tables(pool: &SqlitePool) -> Result<()> {
    create_rivers_table(pool).await?;
    create_species_table(pool).await?;
    create_methods_table(pool).await?;
    create_grilse_weight_gates_table(pool).await?;
    create_submissions_table(pool).await?;
    create_activities_table(pool).await?;
    create_catches_table(pool).await?;
    create_small_catches_table(pool).await?;
    create_grilse_probabilities_table(pool).await?;
    Ok(())
}

pub async fn create_rivers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS rivers (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            internal INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_species_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS species (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            small_catch_mass_kg REAL NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_methods_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS methods (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            internal INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_grilse_weight_gates_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS grilse_weight_gates (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_submissions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS submissions (
            id TEXT PRIMARY KEY,
            contact_id TEXT NOT NULL,
            season INTEGER NOT NULL,
            status TEXT NOT NULL,
            source TEXT NOT NULL,
            reporting_exclude INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (contact_id, season)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_activities_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS activities (
            id TEXT PRIMARY KEY,
            submission_id TEXT NOT NULL REFERENCES submissions(id) ON DELETE CASCADE,
            river_id TEXT NOT NULL REFERENCES rivers(id),
            days_fished_with_mandatory_release INTEGER NOT NULL DEFAULT 0,
            days_fished_other INTEGER NOT NULL DEFAULT 0,
            UNIQUE (submission_id, river_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_catches_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS catches (
            id TEXT PRIMARY KEY,
            activity_id TEXT NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
            date_caught TEXT NOT NULL,
            species_id TEXT NOT NULL REFERENCES species(id),
            method_id TEXT NOT NULL REFERENCES methods(id),
            mass_type TEXT NOT NULL,
            mass_kg REAL NOT NULL,
            mass_oz REAL NOT NULL,
            released INTEGER NOT NULL DEFAULT 0,
            only_month_recorded INTEGER NOT NULL DEFAULT 0,
            no_date_recorded INTEGER NOT NULL DEFAULT 0,
            reporting_exclude INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_small_catches_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS small_catches (
            id TEXT PRIMARY KEY,
            activity_id TEXT NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
            month INTEGER NOT NULL,
            fly_count INTEGER NOT NULL DEFAULT 0,
            spinner_count INTEGER NOT NULL DEFAULT 0,
            bait_count INTEGER NOT NULL DEFAULT 0,
            unknown_count INTEGER NOT NULL DEFAULT 0,
            released INTEGER NOT NULL DEFAULT 0,
            reporting_exclude INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (activity_id, month)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_grilse_probabilities_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS grilse_probabilities (
            id TEXT PRIMARY KEY,
            season INTEGER NOT NULL,
            gate_id INTEGER NOT NULL REFERENCES grilse_weight_gates(id),
            month INTEGER NOT NULL,
            mass_lbs INTEGER NOT NULL,
            probability TEXT NOT NULL,
            version TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Replacement and export both select by these two keys
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_grilse_probabilities_season_gate
        ON grilse_probabilities (season, gate_id)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Seed reference data: species, methods, a starter set of rivers, and the
/// grilse monitoring gates. Uses fixed ids so re-seeding never duplicates.
pub async fn seed_reference_data(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO species (id, name, small_catch_mass_kg) VALUES
            ('10000000-0000-0000-0000-000000000001', 'Salmon', 0.0),
            ('10000000-0000-0000-0000-000000000002', 'Sea Trout', 0.396893)
        "#,
    )
    .execute(pool)
    .await?;

    // 'Unknown' is internal: selectable by paper-return staff, hidden from lists
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO methods (id, name, internal) VALUES
            ('20000000-0000-0000-0000-000000000001', 'Fly', 0),
            ('20000000-0000-0000-0000-000000000002', 'Spinner', 0),
            ('20000000-0000-0000-0000-000000000003', 'Bait', 0),
            ('20000000-0000-0000-0000-000000000004', 'Unknown', 1)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO rivers (id, name, internal) VALUES
            ('30000000-0000-0000-0000-000000000001', 'Derwent (Cumbria)', 0),
            ('30000000-0000-0000-0000-000000000002', 'Eden (Cumbria)', 0),
            ('30000000-0000-0000-0000-000000000003', 'Tyne', 0),
            ('30000000-0000-0000-0000-000000000004', 'Wear', 0),
            ('30000000-0000-0000-0000-000000000005', 'Tees', 0),
            ('30000000-0000-0000-0000-000000000006', 'Ribble', 0),
            ('30000000-0000-0000-0000-000000000007', 'Lune', 0),
            ('30000000-0000-0000-0000-000000000008', 'Unknown (Anglian)', 1)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO grilse_weight_gates (id, name) VALUES
            (1, 'Dee'),
            (2, 'Tamar'),
            (3, 'Tyne'),
            (4, 'Lune')
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schema_creates_and_reseeds_idempotently() {
        let pool = init_in_memory().await.expect("schema should initialize");

        // Second pass must be a no-op, not an error
        create_all_tables(&pool).await.unwrap();
        seed_reference_data(&pool).await.unwrap();

        let species_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM species")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(species_count, 2);

        let method_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM methods")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(method_count, 4);
    }

    #[tokio::test]
    async fn test_file_database_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("rcr.db");

        let pool = init_database(&db_path).await.expect("file db should initialize");
        let gates: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM grilse_weight_gates")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(gates, 4);
        assert!(db_path.exists());
    }
}
