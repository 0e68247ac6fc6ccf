//! Reference data gateways: rivers, species, methods, grilse weight gates
//!
//! All reference tables are seeded at startup and read-only at runtime.
//! Rivers and methods flagged `internal` are kept out of list responses
//! (they exist for paper-return data entry) but stay loadable by id.

use anyhow::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use rcr_common::db::models::{GrilseWeightGate, Method, River, Species};

pub async fn list_rivers(pool: &SqlitePool) -> Result<Vec<River>> {
    let rows = sqlx::query("SELECT id, name, internal FROM rivers WHERE internal = 0 ORDER BY name")
        .fetch_all(pool)
        .await?;

    rows.iter().map(river_from_row).collect()
}

pub async fn load_river(pool: &SqlitePool, id: Uuid) -> Result<Option<River>> {
    let row = sqlx::query("SELECT id, name, internal FROM rivers WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(river_from_row).transpose()
}

fn river_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<River> {
    let id_str: String = row.get("id");
    Ok(River {
        id: Uuid::parse_str(&id_str)?,
        name: row.get("name"),
        internal: row.get::<i64, _>("internal") != 0,
    })
}

pub async fn list_species(pool: &SqlitePool) -> Result<Vec<Species>> {
    let rows = sqlx::query("SELECT id, name, small_catch_mass_kg FROM species ORDER BY name")
        .fetch_all(pool)
        .await?;

    rows.iter().map(species_from_row).collect()
}

pub async fn load_species(pool: &SqlitePool, id: Uuid) -> Result<Option<Species>> {
    let row = sqlx::query("SELECT id, name, small_catch_mass_kg FROM species WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(species_from_row).transpose()
}

fn species_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Species> {
    let id_str: String = row.get("id");
    Ok(Species {
        id: Uuid::parse_str(&id_str)?,
        name: row.get("name"),
        small_catch_mass_kg: row.get("small_catch_mass_kg"),
    })
}

pub async fn list_methods(pool: &SqlitePool) -> Result<Vec<Method>> {
    let rows = sqlx::query("SELECT id, name, internal FROM methods WHERE internal = 0 ORDER BY name")
        .fetch_all(pool)
        .await?;

    rows.iter().map(method_from_row).collect()
}

pub async fn load_method(pool: &SqlitePool, id: Uuid) -> Result<Option<Method>> {
    let row = sqlx::query("SELECT id, name, internal FROM methods WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(method_from_row).transpose()
}

fn method_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Method> {
    let id_str: String = row.get("id");
    Ok(Method {
        id: Uuid::parse_str(&id_str)?,
        name: row.get("name"),
        internal: row.get::<i64, _>("internal") != 0,
    })
}

pub async fn list_gates(pool: &SqlitePool) -> Result<Vec<GrilseWeightGate>> {
    let rows = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, name FROM grilse_weight_gates ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name)| GrilseWeightGate { id, name })
        .collect())
}

pub async fn load_gate(pool: &SqlitePool, id: i64) -> Result<Option<GrilseWeightGate>> {
    let row = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, name FROM grilse_weight_gates WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, name)| GrilseWeightGate { id, name }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcr_common::db::init::init_in_memory;

    #[tokio::test]
    async fn test_internal_rows_hidden_from_lists_but_loadable() {
        let pool = init_in_memory().await.unwrap();

        let methods = list_methods(&pool).await.unwrap();
        assert!(methods.iter().all(|m| !m.internal));
        assert!(methods.iter().any(|m| m.name == "Fly"));

        let unknown_id = Uuid::parse_str("20000000-0000-0000-0000-000000000004").unwrap();
        let unknown = load_method(&pool, unknown_id).await.unwrap().unwrap();
        assert!(unknown.internal);
        assert_eq!(unknown.name, "Unknown");
    }

    #[tokio::test]
    async fn test_seeded_gates() {
        let pool = init_in_memory().await.unwrap();

        let gates = list_gates(&pool).await.unwrap();
        assert_eq!(gates.len(), 4);
        assert_eq!(gates[0].name, "Dee");

        assert!(load_gate(&pool, 1).await.unwrap().is_some());
        assert!(load_gate(&pool, 99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_species_carry_small_catch_mass() {
        let pool = init_in_memory().await.unwrap();

        let species = list_species(&pool).await.unwrap();
        let sea_trout = species.iter().find(|s| s.name == "Sea Trout").unwrap();
        assert!(sea_trout.small_catch_mass_kg > 0.0);
    }
}
