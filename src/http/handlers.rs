//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{ContestDto, ContestListResponse, HealthResponse, HistogramResponse};
use super::error::AppError;
use super::state::AppState;
use crate::histogram::{HistogramError, HistogramQuery, RecordKind};
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
///
/// Health check endpoint to verify the service is running and the record
/// store is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

/// GET /v1/contests
///
/// List all contests, most recent start date first.
pub async fn list_contests(State(state): State<AppState>) -> HandlerResult<ContestListResponse> {
    let contests = state.repository.list_contests().await?;
    let contests: Vec<ContestDto> = contests.into_iter().map(Into::into).collect();
    let total = contests.len();

    Ok(Json(ContestListResponse { contests, total }))
}

/// GET /v1/admin/histogram/{record_kind}
///
/// Histogram over a numeric field of the given record kind. Binning is
/// controlled by exactly one of the bin_size, bin_count or bin_custom
/// parameters; records are filtered by contest or explicit date range
/// plus the tester flag.
pub async fn admin_histogram(
    State(state): State<AppState>,
    Path(record_kind): Path<String>,
    Query(query): Query<HistogramQuery>,
) -> HandlerResult<HistogramResponse> {
    let kind = RecordKind::from_route(&record_kind)
        .ok_or(HistogramError::UnknownRecordKind(record_kind))
        .map_err(AppError::from)?;

    let result = services::histogram(state.repository.as_ref(), kind, &query).await?;
    Ok(Json(result.into()))
}
