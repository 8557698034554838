//! Route definitions for the `/projects` resource, including the
//! project-scoped task graph and statistics endpoints.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{graph, project, stats};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                   -> list
/// POST   /                                   -> create
/// GET    /{project_id}                       -> get_info
/// PUT    /{project_id}/permissions           -> grant_permission
/// GET    /{project_id}/tasks                 -> get_project_tasks
/// PUT    /{project_id}/graph                 -> save
/// GET    /{project_id}/stats/completed       -> completed
/// GET    /{project_id}/stats/over-time       -> over_time
/// GET    /{project_id}/stats/priority        -> priorities
/// GET    /{project_id}/stats/priorities      -> priorities
/// GET    /{project_id}/stats/statuses        -> statuses
/// GET    /{project_id}/stats/position        -> positions
/// ```
pub fn router() -> Router<AppState> {
    let stats_routes = Router::new()
        .route("/completed", get(stats::completed))
        .route("/over-time", get(stats::over_time))
        .route("/priority", get(stats::priorities))
        .route("/priorities", get(stats::priorities))
        .route("/statuses", get(stats::statuses))
        .route("/position", get(stats::positions));

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/{project_id}", get(project::get_info))
        .route("/{project_id}/permissions", put(project::grant_permission))
        .route("/{project_id}/tasks", get(graph::get_project_tasks))
        .route("/{project_id}/graph", put(graph::save))
        .nest("/{project_id}/stats", stats_routes)
}
