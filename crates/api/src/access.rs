//! Per-project access checks shared by the task and graph handlers.

use amaxa_core::error::CoreError;
use amaxa_core::roles::is_project_student;
use amaxa_db::models::project::ProjectInfo;

use crate::error::{AppError, AppResult};
use crate::memo::RequestMemo;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Message returned when an actor may not write to a project.
pub const NO_PROJECT_PERMISSION: &str = "You do not have permissions to modify this project";

/// Load a project's info through the request memo, or 404.
pub async fn require_project(
    state: &AppState,
    memo: &RequestMemo,
    project_id: &str,
) -> AppResult<ProjectInfo> {
    memo.project_info(&state.pool, project_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: project_id.to_string(),
            })
        })
}

/// Reject with 401 unless `user` may mutate `project_id`'s task graph.
///
/// Global admins pass without a lookup; everyone else needs a permission row
/// on the project.
pub async fn require_project_student(
    state: &AppState,
    memo: &RequestMemo,
    user: &AuthUser,
    project_id: &str,
) -> AppResult<()> {
    let permission = if user.is_admin() {
        None
    } else {
        memo.permission(&state.pool, &user.user_id, project_id)
            .await?
    };

    if !is_project_student(&user.role, permission.as_deref()) {
        tracing::debug!(
            user_id = %user.user_id,
            project_id,
            "Project permission check failed"
        );
        return Err(AppError::Core(CoreError::Unauthorized(
            NO_PROJECT_PERMISSION.into(),
        )));
    }
    Ok(())
}
