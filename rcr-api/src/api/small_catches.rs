//! Small catch API handlers
//!
//! Small catches are monthly method-by-method counts of sea trout under
//! the reporting threshold. The month arrives as a canonical month name
//! and resolves through the shared month table.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use rcr_common::db::models::SmallCatch;
use rcr_common::months::month_number;

use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

pub fn small_catch_routes() -> Router<AppState> {
    Router::new()
        .route("/api/small-catches", post(create_small_catch))
        .route("/api/small-catches/:id", get(get_small_catch).delete(delete_small_catch))
        .route("/api/activities/:id/small-catches", get(list_for_activity))
}

/// Per-method counts in a POST /api/small-catches request
#[derive(Debug, Default, Deserialize)]
pub struct SmallCatchCounts {
    #[serde(default)]
    pub fly: i64,
    #[serde(default)]
    pub spinner: i64,
    #[serde(default)]
    pub bait: i64,
    #[serde(default)]
    pub unknown: i64,
}

/// POST /api/small-catches request
#[derive(Debug, Deserialize)]
pub struct CreateSmallCatchRequest {
    pub activity_id: Uuid,
    /// Canonical month name, e.g. "JUNE" (case-insensitive)
    pub month: String,
    #[serde(default)]
    pub counts: SmallCatchCounts,
    #[serde(default)]
    pub released: i64,
}

pub async fn create_small_catch(
    State(state): State<AppState>,
    Json(request): Json<CreateSmallCatchRequest>,
) -> ApiResult<(StatusCode, Json<SmallCatch>)> {
    let month = month_number(&request.month).ok_or_else(|| {
        ApiError::BadRequest(format!("Unknown month: {}", request.month))
    })?;

    let counts = &request.counts;
    if counts.fly < 0 || counts.spinner < 0 || counts.bait < 0 || counts.unknown < 0 {
        return Err(ApiError::BadRequest("Counts must not be negative".to_string()));
    }
    let total = counts.fly + counts.spinner + counts.bait + counts.unknown;
    if total == 0 {
        return Err(ApiError::BadRequest(
            "At least one fish must be counted".to_string(),
        ));
    }
    if request.released < 0 || request.released > total {
        return Err(ApiError::BadRequest(format!(
            "released must be between 0 and the total count ({})",
            total
        )));
    }

    if db::activities::load_activity(&state.db, request.activity_id)
        .await?
        .is_none()
    {
        return Err(ApiError::BadRequest(format!(
            "Activity not found: {}",
            request.activity_id
        )));
    }

    if db::small_catches::month_already_recorded(&state.db, request.activity_id, month).await? {
        return Err(ApiError::Conflict(format!(
            "Small catches already recorded for {} on this activity",
            request.month.to_uppercase()
        )));
    }

    let now = Utc::now();
    let small_catch = SmallCatch {
        id: Uuid::new_v4(),
        activity_id: request.activity_id,
        month,
        fly_count: counts.fly,
        spinner_count: counts.spinner,
        bait_count: counts.bait,
        unknown_count: counts.unknown,
        released: request.released,
        reporting_exclude: false,
        created_at: now,
        updated_at: now,
    };
    db::small_catches::save_small_catch(&state.db, &small_catch).await?;

    Ok((StatusCode::CREATED, Json(small_catch)))
}

pub async fn get_small_catch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SmallCatch>> {
    let small_catch = db::small_catches::load_small_catch(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Small catch not found: {}", id)))?;
    Ok(Json(small_catch))
}

pub async fn list_for_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<SmallCatch>>> {
    let small_catches = db::small_catches::list_small_catches_for_activity(&state.db, id).await?;
    Ok(Json(small_catches))
}

pub async fn delete_small_catch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let removed = db::small_catches::delete_small_catch(&state.db, id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound(format!("Small catch not found: {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
