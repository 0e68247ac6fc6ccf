//! Activity API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use rcr_common::db::models::Activity;

use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

/// Day-count ceilings for one season on one river. The mandatory-release
/// period runs 1 Jan - 16 Jun (167 days); the rest of the year is 198.
const MAX_DAYS_MANDATORY_RELEASE: i64 = 167;
const MAX_DAYS_OTHER: i64 = 198;

pub fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/api/activities", post(create_activity))
        .route("/api/activities/:id", get(get_activity).delete(delete_activity))
        .route("/api/submissions/:id/activities", get(list_for_submission))
}

/// POST /api/activities request
#[derive(Debug, Deserialize)]
pub struct CreateActivityRequest {
    pub submission_id: Uuid,
    pub river_id: Uuid,
    #[serde(default)]
    pub days_fished_with_mandatory_release: i64,
    #[serde(default)]
    pub days_fished_other: i64,
}

pub async fn create_activity(
    State(state): State<AppState>,
    Json(request): Json<CreateActivityRequest>,
) -> ApiResult<(StatusCode, Json<Activity>)> {
    if !(0..=MAX_DAYS_MANDATORY_RELEASE).contains(&request.days_fished_with_mandatory_release) {
        return Err(ApiError::BadRequest(format!(
            "days_fished_with_mandatory_release must be between 0 and {}",
            MAX_DAYS_MANDATORY_RELEASE
        )));
    }
    if !(0..=MAX_DAYS_OTHER).contains(&request.days_fished_other) {
        return Err(ApiError::BadRequest(format!(
            "days_fished_other must be between 0 and {}",
            MAX_DAYS_OTHER
        )));
    }

    if db::submissions::load_submission(&state.db, request.submission_id)
        .await?
        .is_none()
    {
        return Err(ApiError::BadRequest(format!(
            "Submission not found: {}",
            request.submission_id
        )));
    }
    if db::reference::load_river(&state.db, request.river_id).await?.is_none() {
        return Err(ApiError::BadRequest(format!(
            "River not found: {}",
            request.river_id
        )));
    }

    if db::activities::river_already_recorded(&state.db, request.submission_id, request.river_id)
        .await?
    {
        return Err(ApiError::Conflict(format!(
            "Activity already recorded for river {} on this submission",
            request.river_id
        )));
    }

    let activity = Activity {
        id: Uuid::new_v4(),
        submission_id: request.submission_id,
        river_id: request.river_id,
        days_fished_with_mandatory_release: request.days_fished_with_mandatory_release,
        days_fished_other: request.days_fished_other,
    };
    db::activities::save_activity(&state.db, &activity).await?;

    Ok((StatusCode::CREATED, Json(activity)))
}

pub async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Activity>> {
    let activity = db::activities::load_activity(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Activity not found: {}", id)))?;
    Ok(Json(activity))
}

pub async fn list_for_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Activity>>> {
    let activities = db::activities::list_activities_for_submission(&state.db, id).await?;
    Ok(Json(activities))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let removed = db::activities::delete_activity(&state.db, id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound(format!("Activity not found: {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
