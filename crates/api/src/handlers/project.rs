//! Handlers for the `/projects` resource: navigation, breadcrumbs, and
//! admin-only project and permission management.

use amaxa_core::error::CoreError;
use amaxa_core::roles::{is_valid_permission, VALID_PERMISSIONS};
use amaxa_core::task_graph::new_entity_id;
use amaxa_core::types::DbId;
use amaxa_db::models::project::{
    CreateProject, GrantPermission, Project, ProjectInfo, ProjectPermission,
};
use amaxa_db::repositories::{PermissionRepo, ProjectRepo};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::access::require_project;
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::memo::RequestMemo;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects
///
/// Admins see every project; other users see those they hold a permission on.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = if user.is_admin() {
        ProjectRepo::list_all(&state.pool).await?
    } else {
        ProjectRepo::list_for_user(&state.pool, &user.user_id).await?
    };
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{project_id}
pub async fn get_info(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    memo: RequestMemo,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectInfo>>> {
    let info = require_project(&state, &memo, &project_id).await?;
    Ok(Json(DataResponse { data: info }))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(input): ValidatedJson<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let id = input.id.clone().unwrap_or_else(new_entity_id);
    let project = ProjectRepo::create(&state.pool, &id, &input.name).await?;

    tracing::info!(user_id = %admin.user_id, project_id = %project.id, "Created project");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// PUT /api/v1/projects/{project_id}/permissions
///
/// Grant a user a permission level on the project, replacing any previous one.
pub async fn grant_permission(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    memo: RequestMemo,
    Path(project_id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<GrantPermission>,
) -> AppResult<Json<DataResponse<ProjectPermission>>> {
    if !is_valid_permission(&input.permission) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown permission '{}'. Expected one of: {}",
            input.permission,
            VALID_PERMISSIONS.join(", ")
        ))));
    }
    require_project(&state, &memo, &project_id).await?;

    let granted =
        PermissionRepo::grant(&state.pool, &input.user_id, &project_id, &input.permission).await?;

    tracing::info!(
        user_id = %admin.user_id,
        project_id = %project_id,
        grantee = %granted.user_id,
        permission = %granted.permission,
        "Granted project permission"
    );
    Ok(Json(DataResponse { data: granted }))
}
