//! Reference data API handlers
//!
//! Read-only lookup endpoints for rivers, species, methods and grilse
//! weight gates.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use rcr_common::db::models::{GrilseWeightGate, Method, River, Species};

use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

pub fn reference_routes() -> Router<AppState> {
    Router::new()
        .route("/api/rivers", get(list_rivers))
        .route("/api/rivers/:id", get(get_river))
        .route("/api/species", get(list_species))
        .route("/api/species/:id", get(get_species))
        .route("/api/methods", get(list_methods))
        .route("/api/methods/:id", get(get_method))
        .route("/api/grilse-gates", get(list_gates))
}

pub async fn list_rivers(State(state): State<AppState>) -> ApiResult<Json<Vec<River>>> {
    Ok(Json(db::reference::list_rivers(&state.db).await?))
}

pub async fn get_river(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<River>> {
    let river = db::reference::load_river(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("River not found: {}", id)))?;
    Ok(Json(river))
}

pub async fn list_species(State(state): State<AppState>) -> ApiResult<Json<Vec<Species>>> {
    Ok(Json(db::reference::list_species(&state.db).await?))
}

pub async fn get_species(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Species>> {
    let species = db::reference::load_species(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Species not found: {}", id)))?;
    Ok(Json(species))
}

pub async fn list_methods(State(state): State<AppState>) -> ApiResult<Json<Vec<Method>>> {
    Ok(Json(db::reference::list_methods(&state.db).await?))
}

pub async fn get_method(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Method>> {
    let method = db::reference::load_method(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Method not found: {}", id)))?;
    Ok(Json(method))
}

pub async fn list_gates(State(state): State<AppState>) -> ApiResult<Json<Vec<GrilseWeightGate>>> {
    Ok(Json(db::reference::list_gates(&state.db).await?))
}
