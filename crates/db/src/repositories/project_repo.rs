//! Repository for the `projects` table.

use sqlx::PgPool;

use crate::models::project::{Project, ProjectInfo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project with a caller-chosen id.
    pub async fn create(pool: &PgPool, id: &str, name: &str) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (id, name)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Id and name only, for breadcrumbs and permission checks.
    pub async fn find_info(pool: &PgPool, id: &str) -> Result<Option<ProjectInfo>, sqlx::Error> {
        sqlx::query_as::<_, ProjectInfo>("SELECT id, name FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// List the projects a user holds any permission on, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<Project>, sqlx::Error> {
        let query = "SELECT p.id, p.name, p.created_at
             FROM projects p
             JOIN project_permissions pp ON pp.project_id = p.id
             WHERE pp.user_id = $1
             ORDER BY p.created_at DESC, p.id";
        sqlx::query_as::<_, Project>(query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
