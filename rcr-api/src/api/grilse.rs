//! Grilse probability API handlers
//!
//! POST /api/reporting/reference/grilse-probabilities/:season/:gate
//! GET  /api/reporting/reference/grilse-probabilities/:season
//!
//! The upload endpoint's error bodies follow the established wire contract
//! exactly; consumers key on `errorType`/`row`/`col` entries and on the
//! fixed conflict message.

use axum::{
    body::Bytes,
    extract::{OriginalUri, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::grilse::{self, GrilseError};
use crate::{db, AppState};

pub fn grilse_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/reporting/reference/grilse-probabilities/:season/:gate",
            post(upload_probabilities).delete(delete_probabilities),
        )
        .route(
            "/api/reporting/reference/grilse-probabilities/:season",
            get(export_probabilities),
        )
}

/// Upload query flags
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Allow replacing existing season/gate data (defaults to false)
    #[serde(default)]
    pub overwrite: Option<bool>,
}

/// POST the raw CSV body for one season and gate.
///
/// Responds 201 with an empty body on success, including when every
/// probability was filtered out and zero records were written.
pub async fn upload_probabilities(
    State(state): State<AppState>,
    Path((season, gate_id)): Path<(i64, i64)>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> ApiResult<Response> {
    if db::reference::load_gate(&state.db, gate_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Gate not found: {}", gate_id)));
    }

    let overwrite = query.overwrite.unwrap_or(false);
    match grilse::upload_probabilities(&state.db, season, gate_id, &body, overwrite).await {
        Ok(_) => Ok(StatusCode::CREATED.into_response()),
        Err(err) => Ok(upload_error_response(err, uri.path())),
    }
}

/// Render a pipeline failure into its contracted response body
fn upload_error_response(err: GrilseError, path: &str) -> Response {
    let timestamp = Utc::now().to_rfc3339();
    match err {
        GrilseError::EmptyOrInvalidFile => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "status": 422,
                "message": "File is empty or not a valid csv.",
                "error": "Unprocessable Entity",
                "path": path,
                "timestamp": timestamp,
            })),
        )
            .into_response(),
        GrilseError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": 400,
                "message": "400 BAD_REQUEST \"Invalid CSV data\"",
                "errors": errors,
                "path": path,
                "timestamp": timestamp,
            })),
        )
            .into_response(),
        GrilseError::Conflict => (
            StatusCode::CONFLICT,
            Json(json!({ "message": grilse::CONFLICT_MESSAGE })),
        )
            .into_response(),
        GrilseError::Database(db_err) => {
            // Log with the original error, surface nothing internal
            error!(error = %db_err, path, "Grilse upload failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": 500,
                    "message": "Internal server error",
                    "path": path,
                    "timestamp": timestamp,
                })),
            )
                .into_response()
        }
    }
}

/// DELETE all stored probabilities for one season and gate
/// (administrative cleanup; idempotent)
pub async fn delete_probabilities(
    State(state): State<AppState>,
    Path((season, gate_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    let removed = db::grilse::delete_for_season_and_gate(&state.db, season, gate_id)
        .await
        .map_err(|e| ApiError::Other(e.into()))?;
    info!(season, gate_id, removed, "Grilse probabilities deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET stored probabilities for a season or inclusive `start-end` range as
/// CSV text
pub async fn export_probabilities(
    State(state): State<AppState>,
    Path(season_spec): Path<String>,
) -> ApiResult<Response> {
    let (start, end) = parse_season_range(&season_spec).ok_or_else(|| {
        ApiError::BadRequest(format!("Invalid season or season range: {}", season_spec))
    })?;

    let rows = db::grilse::fetch_report_rows(&state.db, start, end)
        .await
        .map_err(|e| ApiError::Other(e.into()))?;
    let csv = grilse::export_csv(&rows);

    Ok(([(header::CONTENT_TYPE, "text/csv")], csv).into_response())
}

/// Parse `2024` or `2018-2024` into an inclusive season range
fn parse_season_range(spec: &str) -> Option<(i64, i64)> {
    match spec.split_once('-') {
        Some((start, end)) => {
            let start: i64 = start.trim().parse().ok()?;
            let end: i64 = end.trim().parse().ok()?;
            (start <= end).then_some((start, end))
        }
        None => {
            let season: i64 = spec.trim().parse().ok()?;
            Some((season, season))
        }
    }
}
