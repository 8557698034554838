//! Route definitions for the `/tasks` resource.

use axum::routing::{patch, post};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// POST   /            -> create
/// PATCH  /{id}        -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(tasks::create))
        .route("/{id}", patch(tasks::update))
}
