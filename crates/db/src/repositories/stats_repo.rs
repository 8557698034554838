//! Read-only aggregations over a project's tasks for the dashboard widgets.

use amaxa_core::task_graph::{TaskPriority, TaskStatus};
use amaxa_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::stats::{
    GridCellCount, MonthBucketRow, MonthlyTaskCount, PriorityCount, StatusCount,
};

/// Grouped task counts, computed at query time.
pub struct StatsRepo;

impl StatsRepo {
    /// Completed (`done`) tasks created at or after `since`, per calendar
    /// month (UTC), oldest month first.
    pub async fn completed_by_month(
        pool: &PgPool,
        project_id: &str,
        since: Timestamp,
    ) -> Result<Vec<MonthlyTaskCount>, sqlx::Error> {
        let rows = sqlx::query_as::<_, MonthBucketRow>(
            "SELECT date_trunc('month', created_at, 'UTC') AS month_start, COUNT(*) AS count
             FROM tasks
             WHERE project_id = $1 AND status = $2 AND created_at >= $3
             GROUP BY 1
             ORDER BY 1",
        )
        .bind(project_id)
        .bind(TaskStatus::Done.as_str())
        .bind(since)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(MonthlyTaskCount::from).collect())
    }

    /// All tasks per calendar month of creation (UTC), oldest month first.
    pub async fn created_by_month(
        pool: &PgPool,
        project_id: &str,
    ) -> Result<Vec<MonthlyTaskCount>, sqlx::Error> {
        let rows = sqlx::query_as::<_, MonthBucketRow>(
            "SELECT date_trunc('month', created_at, 'UTC') AS month_start, COUNT(*) AS count
             FROM tasks
             WHERE project_id = $1
             GROUP BY 1
             ORDER BY 1",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(MonthlyTaskCount::from).collect())
    }

    /// Tasks per priority, lowest priority first. Empty buckets are omitted.
    pub async fn by_priority(
        pool: &PgPool,
        project_id: &str,
    ) -> Result<Vec<PriorityCount>, sqlx::Error> {
        let order: Vec<&str> = TaskPriority::ALL.iter().map(|p| p.as_str()).collect();
        sqlx::query_as::<_, PriorityCount>(
            "SELECT priority, COUNT(*) AS count
             FROM tasks
             WHERE project_id = $1
             GROUP BY priority
             ORDER BY array_position($2::text[], priority)",
        )
        .bind(project_id)
        .bind(&order)
        .fetch_all(pool)
        .await
    }

    /// Tasks per status, in workflow order. Empty buckets are omitted.
    pub async fn by_status(pool: &PgPool, project_id: &str) -> Result<Vec<StatusCount>, sqlx::Error> {
        let order: Vec<&str> = TaskStatus::ALL.iter().map(|s| s.as_str()).collect();
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count
             FROM tasks
             WHERE project_id = $1
             GROUP BY status
             ORDER BY array_position($2::text[], status)",
        )
        .bind(project_id)
        .bind(&order)
        .fetch_all(pool)
        .await
    }

    /// Tasks per square canvas cell of side `cell_size`.
    ///
    /// Cell `(cell_x, cell_y)` covers `[cell_x * size, (cell_x + 1) * size)`
    /// horizontally and likewise vertically.
    pub async fn by_grid_cell(
        pool: &PgPool,
        project_id: &str,
        cell_size: f64,
    ) -> Result<Vec<GridCellCount>, sqlx::Error> {
        sqlx::query_as::<_, GridCellCount>(
            "SELECT floor(position_x / $2)::bigint AS cell_x,
                    floor(position_y / $2)::bigint AS cell_y,
                    COUNT(*) AS count
             FROM tasks
             WHERE project_id = $1
             GROUP BY 1, 2
             ORDER BY 1, 2",
        )
        .bind(project_id)
        .bind(cell_size)
        .fetch_all(pool)
        .await
    }
}
