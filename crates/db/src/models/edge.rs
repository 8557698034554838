//! Edge entity model and DTOs.

use amaxa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `edges` table: a directed link `source -> target`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Edge {
    pub id: DbId,
    pub project_id: DbId,
    pub source: DbId,
    pub target: DbId,
    pub created_at: Timestamp,
}

/// An edge as sent by the canvas editor in a batch save.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EdgeInput {
    #[validate(length(min = 1, max = 128))]
    pub id: DbId,
    #[validate(length(min = 1))]
    pub project_id: DbId,
    #[validate(length(min = 1))]
    pub source: DbId,
    #[validate(length(min = 1))]
    pub target: DbId,
}
