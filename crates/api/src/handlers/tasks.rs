//! Handlers for single-task create and update.

use amaxa_core::error::CoreError;
use amaxa_core::task_graph::{new_entity_id, normalize_parent_id};
use amaxa_core::types::DbId;
use amaxa_db::models::task::{CreateTask, Task, UpdateTask};
use amaxa_db::repositories::TaskRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::access::{require_project, require_project_student};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::memo::RequestMemo;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn task_not_found(id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Task",
        id: id.to_string(),
    })
}

/// POST /api/v1/tasks
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    memo: RequestMemo,
    ValidatedJson(input): ValidatedJson<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    require_project_student(&state, &memo, &user, &input.project_id).await?;
    require_project(&state, &memo, &input.project_id).await?;

    // A missing parent is left to the foreign key.
    if let Some(parent_id) = normalize_parent_id(Some(&input.parent_id)) {
        if let Some(parent) = TaskRepo::find_by_id(&state.pool, &parent_id).await? {
            if parent.project_id != input.project_id {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "Parent task '{parent_id}' belongs to another project"
                ))));
            }
        }
    }

    let id = new_entity_id();
    let task = TaskRepo::create(&state.pool, &id, &input).await?;

    tracing::info!(
        user_id = %user.user_id,
        project_id = %task.project_id,
        task_id = %task.id,
        "Created task"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// PATCH /api/v1/tasks/{id}
///
/// Requires project-student permission on the task's project.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    memo: RequestMemo,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateTask>,
) -> AppResult<Json<DataResponse<Task>>> {
    let existing = TaskRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| task_not_found(&id))?;
    require_project_student(&state, &memo, &user, &existing.project_id).await?;

    if input.is_empty() {
        return Ok(Json(DataResponse { data: existing }));
    }

    let task = TaskRepo::update(&state.pool, &id, &input)
        .await?
        .ok_or_else(|| task_not_found(&id))?;

    tracing::info!(
        user_id = %user.user_id,
        project_id = %task.project_id,
        task_id = %task.id,
        "Updated task"
    );
    Ok(Json(DataResponse { data: task }))
}
