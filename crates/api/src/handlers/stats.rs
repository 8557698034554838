//! Dashboard statistics for a project's tasks.
//!
//! All endpoints are read-only and require an authenticated user.

use amaxa_core::stats::{
    validate_cell_size, validate_window_months, window_start, DEFAULT_GRID_CELL_SIZE,
};
use amaxa_core::types::DbId;
use amaxa_db::models::stats::{GridCellCount, MonthlyTaskCount, PriorityCount, StatusCount};
use amaxa_db::repositories::StatsRepo;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::access::require_project;
use crate::error::AppResult;
use crate::extract::QueryParams;
use crate::memo::RequestMemo;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct WindowParams {
    /// Months to look back. Defaults to the configured window.
    pub months: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GridParams {
    /// Side length of a grid cell in canvas units.
    pub cell_size: Option<f64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{project_id}/stats/completed
///
/// Done tasks per month over the reporting window.
pub async fn completed(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    memo: RequestMemo,
    Path(project_id): Path<DbId>,
    QueryParams(params): QueryParams<WindowParams>,
) -> AppResult<Json<DataResponse<Vec<MonthlyTaskCount>>>> {
    let months = params.months.unwrap_or(state.config.stats_window_months);
    validate_window_months(months)?;
    require_project(&state, &memo, &project_id).await?;

    let since = window_start(chrono::Utc::now(), months);
    let rows = StatsRepo::completed_by_month(&state.pool, &project_id, since).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/projects/{project_id}/stats/over-time
///
/// All tasks per month of creation, over the project's whole history.
pub async fn over_time(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    memo: RequestMemo,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MonthlyTaskCount>>>> {
    require_project(&state, &memo, &project_id).await?;
    let rows = StatsRepo::created_by_month(&state.pool, &project_id).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/projects/{project_id}/stats/priority
/// GET /api/v1/projects/{project_id}/stats/priorities
pub async fn priorities(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    memo: RequestMemo,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PriorityCount>>>> {
    require_project(&state, &memo, &project_id).await?;
    let rows = StatsRepo::by_priority(&state.pool, &project_id).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/projects/{project_id}/stats/statuses
pub async fn statuses(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    memo: RequestMemo,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<StatusCount>>>> {
    require_project(&state, &memo, &project_id).await?;
    let rows = StatsRepo::by_status(&state.pool, &project_id).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/projects/{project_id}/stats/position
///
/// Tasks per canvas grid cell.
pub async fn positions(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    memo: RequestMemo,
    Path(project_id): Path<DbId>,
    QueryParams(params): QueryParams<GridParams>,
) -> AppResult<Json<DataResponse<Vec<GridCellCount>>>> {
    let cell_size = params.cell_size.unwrap_or(DEFAULT_GRID_CELL_SIZE);
    validate_cell_size(cell_size)?;
    require_project(&state, &memo, &project_id).await?;

    let rows = StatsRepo::by_grid_cell(&state.pool, &project_id, cell_size).await?;
    Ok(Json(DataResponse { data: rows }))
}
