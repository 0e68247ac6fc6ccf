//! Submission API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use rcr_common::db::models::{Submission, SubmissionSource, SubmissionStatus};

use crate::error::{ApiError, ApiResult};
use crate::{db, AppState};

pub fn submission_routes() -> Router<AppState> {
    Router::new()
        .route("/api/submissions", post(create_submission).get(search_submissions))
        .route(
            "/api/submissions/:id",
            get(get_submission).patch(update_submission).delete(delete_submission),
        )
}

/// POST /api/submissions request
#[derive(Debug, Deserialize)]
pub struct CreateSubmissionRequest {
    pub contact_id: String,
    pub season: i64,
    #[serde(default = "default_status")]
    pub status: SubmissionStatus,
    pub source: SubmissionSource,
}

fn default_status() -> SubmissionStatus {
    SubmissionStatus::Incomplete
}

pub async fn create_submission(
    State(state): State<AppState>,
    Json(request): Json<CreateSubmissionRequest>,
) -> ApiResult<(StatusCode, Json<Submission>)> {
    if request.contact_id.trim().is_empty() {
        return Err(ApiError::BadRequest("contact_id must not be empty".to_string()));
    }
    if !(1900..=3000).contains(&request.season) {
        return Err(ApiError::BadRequest(format!(
            "Season out of range: {}",
            request.season
        )));
    }

    if db::submissions::find_submission(&state.db, &request.contact_id, request.season)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(format!(
            "Submission already exists for contact {} in season {}",
            request.contact_id, request.season
        )));
    }

    let now = Utc::now();
    let submission = Submission {
        id: Uuid::new_v4(),
        contact_id: request.contact_id,
        season: request.season,
        status: request.status,
        source: request.source,
        reporting_exclude: false,
        created_at: now,
        updated_at: now,
    };
    db::submissions::save_submission(&state.db, &submission).await?;

    tracing::info!(
        submission_id = %submission.id,
        season = submission.season,
        "Submission created"
    );

    Ok((StatusCode::CREATED, Json(submission)))
}

pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Submission>> {
    let submission = db::submissions::load_submission(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Submission not found: {}", id)))?;
    Ok(Json(submission))
}

/// GET /api/submissions query filters
#[derive(Debug, Deserialize)]
pub struct SubmissionSearchQuery {
    pub contact_id: Option<String>,
    pub season: Option<i64>,
}

pub async fn search_submissions(
    State(state): State<AppState>,
    Query(query): Query<SubmissionSearchQuery>,
) -> ApiResult<Json<Vec<Submission>>> {
    let submissions =
        db::submissions::search_submissions(&state.db, query.contact_id.as_deref(), query.season)
            .await?;
    Ok(Json(submissions))
}

/// PATCH /api/submissions/:id request
#[derive(Debug, Deserialize)]
pub struct UpdateSubmissionRequest {
    pub status: Option<SubmissionStatus>,
    pub reporting_exclude: Option<bool>,
}

pub async fn update_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSubmissionRequest>,
) -> ApiResult<Json<Submission>> {
    let existing = db::submissions::load_submission(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Submission not found: {}", id)))?;

    let status = request.status.unwrap_or(existing.status);
    let reporting_exclude = request.reporting_exclude.unwrap_or(existing.reporting_exclude);
    db::submissions::update_submission(&state.db, id, status, reporting_exclude).await?;

    let updated = db::submissions::load_submission(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::Internal("Submission vanished during update".to_string()))?;
    Ok(Json(updated))
}

pub async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let removed = db::submissions::delete_submission(&state.db, id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound(format!("Submission not found: {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
