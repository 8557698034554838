//! User entity model and DTOs.
//!
//! Users are provisioned by the authentication provider; this service only
//! reads them for assignee summaries and permission checks.

use amaxa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub role: String,
    pub created_at: Timestamp,
}

/// DTO for provisioning a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub id: DbId,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    /// Defaults to `"user"` if omitted.
    pub role: Option<String>,
}
