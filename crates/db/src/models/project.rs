//! Project entity model, permission rows, and DTOs.

use amaxa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// The slice of a project needed for breadcrumbs and navigation.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ProjectInfo {
    pub id: DbId,
    pub name: String,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    /// Server mints a UUID when omitted.
    #[validate(length(min = 1, max = 128))]
    pub id: Option<DbId>,
    #[validate(length(min = 1, max = 256))]
    pub name: String,
}

/// A row from the `project_permissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectPermission {
    pub user_id: DbId,
    pub project_id: DbId,
    pub permission: String,
    pub created_at: Timestamp,
}

/// DTO for granting (or replacing) a user's permission on a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GrantPermission {
    #[validate(length(min = 1))]
    pub user_id: DbId,
    /// One of `student`, `coach`, `admin`.
    pub permission: String,
}
