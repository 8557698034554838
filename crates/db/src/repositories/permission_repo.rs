//! Repository for the `project_permissions` table.

use sqlx::PgPool;

use crate::models::project::ProjectPermission;

const COLUMNS: &str = "user_id, project_id, permission, created_at";

/// Per-project permission lookups and grants.
pub struct PermissionRepo;

impl PermissionRepo {
    /// The permission level a user holds on a project, if any.
    pub async fn find_permission(
        pool: &PgPool,
        user_id: &str,
        project_id: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT permission FROM project_permissions WHERE user_id = $1 AND project_id = $2",
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Grant a permission, replacing any level the user already held.
    pub async fn grant(
        pool: &PgPool,
        user_id: &str,
        project_id: &str,
        permission: &str,
    ) -> Result<ProjectPermission, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_permissions (user_id, project_id, permission)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, project_id) DO UPDATE SET permission = EXCLUDED.permission
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectPermission>(&query)
            .bind(user_id)
            .bind(project_id)
            .bind(permission)
            .fetch_one(pool)
            .await
    }
}
