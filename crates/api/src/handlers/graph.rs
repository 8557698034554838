//! Handlers for reading and batch-saving a project's task graph.

use amaxa_core::error::CoreError;
use amaxa_core::task_graph::{check_batch_shape, check_same_project};
use amaxa_core::types::DbId;
use amaxa_db::models::graph::{
    GraphSaveOutcome, GraphSaveSummary, ProjectGraph, SaveGraph, TaskUpsert,
};
use amaxa_db::repositories::GraphRepo;
use axum::extract::{Path, State};
use axum::Json;

use crate::access::{require_project, require_project_student};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::memo::RequestMemo;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/tasks
///
/// Every task (as a canvas node) and edge of the project, from one snapshot.
pub async fn get_project_tasks(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectGraph>>> {
    let graph = GraphRepo::load(&state.pool, &project_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: project_id.clone(),
            })
        })?;

    tracing::debug!(
        user_id = %user.user_id,
        project_id = %project_id,
        task_count = graph.tasks.len(),
        edge_count = graph.edges.len(),
        "Loaded project graph"
    );
    Ok(Json(DataResponse { data: graph }))
}

/// PUT /api/v1/projects/{project_id}/graph
///
/// Upsert the submitted tasks and edges. Nothing is written unless the whole
/// batch is accepted.
pub async fn save(
    State(state): State<AppState>,
    user: AuthUser,
    memo: RequestMemo,
    Path(project_id): Path<DbId>,
    ValidatedJson(body): ValidatedJson<SaveGraph>,
) -> AppResult<Json<DataResponse<GraphSaveSummary>>> {
    require_project_student(&state, &memo, &user, &project_id).await?;
    require_project(&state, &memo, &project_id).await?;

    if let Some(body_project) = body.project_id.as_deref() {
        if body_project != project_id {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Body project_id '{body_project}' does not match path project '{project_id}'"
            ))));
        }
    }
    check_same_project(
        &project_id,
        "Task",
        body.tasks
            .iter()
            .map(|t| (t.id.as_str(), t.data.project_id.as_str())),
    )?;
    check_same_project(
        &project_id,
        "Edge",
        body.edges
            .iter()
            .map(|e| (e.id.as_str(), e.project_id.as_str())),
    )?;
    check_batch_shape(
        body.tasks.iter().map(|t| t.id.as_str()),
        body.edges.iter().map(|e| e.id.as_str()),
    )?;

    let rows: Vec<TaskUpsert> = body.tasks.iter().map(|node| node.to_upsert()).collect();

    match GraphRepo::save(&state.pool, &project_id, &rows, &body.edges).await? {
        GraphSaveOutcome::Saved { tasks, edges } => {
            tracing::info!(
                user_id = %user.user_id,
                project_id = %project_id,
                task_count = tasks,
                edge_count = edges,
                "Saved project graph"
            );
            Ok(Json(DataResponse {
                data: GraphSaveSummary { tasks, edges },
            }))
        }
        GraphSaveOutcome::ForeignIds { entity } => Err(AppError::Core(CoreError::Conflict(
            format!("{entity} ids in this save already belong to another project"),
        ))),
    }
}
