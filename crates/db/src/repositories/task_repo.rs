//! Repository for the `tasks` table (single-row operations).
//!
//! Bulk writes of a whole canvas live in [`super::GraphRepo`].

use amaxa_core::task_graph::{normalize_parent_id, DEFAULT_TASK_TYPE};
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, UpdateTask};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, project_id, type, title, description, status, priority, \
     label, position_x, position_y, assignee_id, parent_id, done_by, created_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task under the given id, returning the created row.
    ///
    /// Omitted `type`, `status` and `priority` fall back to their defaults.
    pub async fn create(pool: &PgPool, id: &str, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (id, project_id, type, title, description, status, priority, label,
                 position_x, position_y, assignee_id, parent_id, done_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.project_id)
            .bind(input.task_type.as_deref().unwrap_or(DEFAULT_TASK_TYPE))
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.unwrap_or_default().as_str())
            .bind(input.priority.unwrap_or_default().as_str())
            .bind(&input.label)
            .bind(input.position.x)
            .bind(input.position.y)
            .bind(&input.assignee_id)
            .bind(normalize_parent_id(Some(&input.parent_id)))
            .bind(input.done_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                position_x = COALESCE($3, position_x),
                position_y = COALESCE($4, position_y),
                assignee_id = COALESCE($5, assignee_id),
                status = COALESCE($6, status),
                done_by = COALESCE($7, done_by),
                description = COALESCE($8, description),
                priority = COALESCE($9, priority)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.position.map(|p| p.x))
            .bind(input.position.map(|p| p.y))
            .bind(&input.assignee_id)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.done_by)
            .bind(&input.description)
            .bind(input.priority.map(|p| p.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Count tasks in a project.
    pub async fn count_by_project(pool: &PgPool, project_id: &str) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
