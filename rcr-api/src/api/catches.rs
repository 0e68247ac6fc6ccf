//! Catch API handlers
//!
//! A catch mass arrives in the unit the angler reported; the other unit is
//! derived at creation time so reporting can use either.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use rcr_common::db::models::{Catch, MassType};

use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

/// Ounces per kilogram, used to derive the unreported unit
const OUNCES_PER_KG: f64 = 35.273_962;

/// Largest plausible rod-caught mass; anything heavier is a typo
const MAX_MASS_KG: f64 = 50.0;

pub fn catch_routes() -> Router<AppState> {
    Router::new()
        .route("/api/catches", post(create_catch))
        .route("/api/catches/:id", get(get_catch).delete(delete_catch))
        .route("/api/activities/:id/catches", get(list_for_activity))
}

/// POST /api/catches request
#[derive(Debug, Deserialize)]
pub struct CreateCatchRequest {
    pub activity_id: Uuid,
    pub date_caught: NaiveDate,
    pub species_id: Uuid,
    pub method_id: Uuid,
    pub mass_type: MassType,
    /// Mass in the unit named by `mass_type` (kg or oz)
    pub mass: f64,
    pub released: bool,
    #[serde(default)]
    pub only_month_recorded: bool,
    #[serde(default)]
    pub no_date_recorded: bool,
}

pub async fn create_catch(
    State(state): State<AppState>,
    Json(request): Json<CreateCatchRequest>,
) -> ApiResult<(StatusCode, Json<Catch>)> {
    let (mass_kg, mass_oz) = match request.mass_type {
        MassType::Metric => (request.mass, request.mass * OUNCES_PER_KG),
        MassType::Imperial => (request.mass / OUNCES_PER_KG, request.mass),
    };
    if !mass_kg.is_finite() || mass_kg <= 0.0 || mass_kg >= MAX_MASS_KG {
        return Err(ApiError::BadRequest(format!(
            "Catch mass must be positive and below {} kg",
            MAX_MASS_KG
        )));
    }

    let activity = db::activities::load_activity(&state.db, request.activity_id)
        .await?
        .ok_or_else(|| {
            ApiError::BadRequest(format!("Activity not found: {}", request.activity_id))
        })?;
    let submission = db::submissions::load_submission(&state.db, activity.submission_id)
        .await?
        .ok_or_else(|| ApiError::Internal("Activity has no submission".to_string()))?;

    // The catch date must fall inside the submission's season
    if i64::from(request.date_caught.year()) != submission.season {
        return Err(ApiError::BadRequest(format!(
            "date_caught {} is outside season {}",
            request.date_caught, submission.season
        )));
    }

    if db::reference::load_species(&state.db, request.species_id).await?.is_none() {
        return Err(ApiError::BadRequest(format!(
            "Species not found: {}",
            request.species_id
        )));
    }
    if db::reference::load_method(&state.db, request.method_id).await?.is_none() {
        return Err(ApiError::BadRequest(format!(
            "Method not found: {}",
            request.method_id
        )));
    }

    let now = Utc::now();
    let catch = Catch {
        id: Uuid::new_v4(),
        activity_id: request.activity_id,
        date_caught: request.date_caught,
        species_id: request.species_id,
        method_id: request.method_id,
        mass_type: request.mass_type,
        mass_kg,
        mass_oz,
        released: request.released,
        only_month_recorded: request.only_month_recorded,
        no_date_recorded: request.no_date_recorded,
        reporting_exclude: false,
        created_at: now,
        updated_at: now,
    };
    db::catches::save_catch(&state.db, &catch).await?;

    Ok((StatusCode::CREATED, Json(catch)))
}

pub async fn get_catch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Catch>> {
    let catch = db::catches::load_catch(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Catch not found: {}", id)))?;
    Ok(Json(catch))
}

pub async fn list_for_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Catch>>> {
    let catches = db::catches::list_catches_for_activity(&state.db, id).await?;
    Ok(Json(catches))
}

pub async fn delete_catch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let removed = db::catches::delete_catch(&state.db, id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound(format!("Catch not found: {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion_round_trip() {
        let kg = 4.5;
        let oz = kg * OUNCES_PER_KG;
        assert!((oz / OUNCES_PER_KG - kg).abs() < 1e-9);
        assert!((oz - 158.732829).abs() < 1e-3);
    }
}
