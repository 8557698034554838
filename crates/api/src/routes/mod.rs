pub mod health;
pub mod project;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                        list, create (admin)
/// /projects/{project_id}                           project info
/// /projects/{project_id}/permissions               grant permission (admin)
/// /projects/{project_id}/tasks                     tasks + edges as a graph
/// /projects/{project_id}/graph                     batch save (PUT)
/// /projects/{project_id}/stats/completed           done tasks per month
/// /projects/{project_id}/stats/over-time           all tasks per month
/// /projects/{project_id}/stats/priority            tasks per priority
/// /projects/{project_id}/stats/priorities          tasks per priority
/// /projects/{project_id}/stats/statuses            tasks per status
/// /projects/{project_id}/stats/position            tasks per canvas cell
///
/// /tasks                                           create (POST)
/// /tasks/{id}                                      update (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/tasks", tasks::router())
}
