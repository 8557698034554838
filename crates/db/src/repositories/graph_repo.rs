//! Repository for whole-canvas reads and batch saves of `tasks` + `edges`.

use amaxa_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::edge::{Edge, EdgeInput};
use crate::models::graph::{GraphSaveOutcome, ProjectGraph, TaskNode, TaskUpsert};
use crate::models::task::TaskWithAssignee;

const JOINED_TASK_COLUMNS: &str = "t.id, t.project_id, t.type, t.title, t.description, \
     t.status, t.priority, t.label, t.position_x, t.position_y, t.assignee_id, t.parent_id, \
     t.done_by, t.created_at, u.name AS assignee_name, u.image AS assignee_image";

const EDGE_COLUMNS: &str = "id, project_id, source, target, created_at";

/// Loads and saves a project's task graph.
pub struct GraphRepo;

impl GraphRepo {
    /// Load every task (as a canvas node) and edge of a project.
    ///
    /// Both reads run in one `REPEATABLE READ` read-only transaction so the
    /// edges always match the tasks. Returns `None` if the project does not
    /// exist.
    pub async fn load(pool: &PgPool, project_id: &str) -> Result<Option<ProjectGraph>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let exists: Option<(String,)> = sqlx::query_as("SELECT id FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            "SELECT {JOINED_TASK_COLUMNS}
             FROM tasks t
             LEFT JOIN users u ON u.id = t.assignee_id
             WHERE t.project_id = $1
             ORDER BY t.created_at, t.id"
        );
        let tasks = sqlx::query_as::<_, TaskWithAssignee>(&query)
            .bind(project_id)
            .fetch_all(&mut *tx)
            .await?;

        let query = format!(
            "SELECT {EDGE_COLUMNS} FROM edges WHERE project_id = $1 ORDER BY created_at, id"
        );
        let edges = sqlx::query_as::<_, Edge>(&query)
            .bind(project_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(ProjectGraph {
            tasks: tasks.into_iter().map(TaskNode::from).collect(),
            edges,
        }))
    }

    /// Upsert a batch of tasks and edges for one project in one transaction.
    ///
    /// Existing rows get their editable columns overwritten; `position` and
    /// `created_at` keep their stored values. A row whose id already exists
    /// under a different project is not touched, and if that happens for
    /// any row, or a parent link or edge reaches a task of another project, the whole
    /// batch is rolled back and [`GraphSaveOutcome::ForeignIds`] returned.
    ///
    /// Callers must ensure every row already names `project_id` and that ids
    /// are unique within the batch.
    pub async fn save(
        pool: &PgPool,
        project_id: &str,
        tasks: &[TaskUpsert],
        edges: &[EdgeInput],
    ) -> Result<GraphSaveOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut tasks_written = 0;
        if !tasks.is_empty() {
            let ids: Vec<DbId> = tasks.iter().map(|t| t.id.clone()).collect();
            let project_ids: Vec<DbId> = tasks.iter().map(|t| t.project_id.clone()).collect();
            let types: Vec<String> = tasks.iter().map(|t| t.task_type.clone()).collect();
            let titles: Vec<String> = tasks.iter().map(|t| t.title.clone()).collect();
            let descriptions: Vec<String> = tasks.iter().map(|t| t.description.clone()).collect();
            let statuses: Vec<&str> = tasks.iter().map(|t| t.status.as_str()).collect();
            let priorities: Vec<&str> = tasks.iter().map(|t| t.priority.as_str()).collect();
            let labels: Vec<Option<String>> = tasks.iter().map(|t| t.label.clone()).collect();
            let xs: Vec<f64> = tasks.iter().map(|t| t.position.x).collect();
            let ys: Vec<f64> = tasks.iter().map(|t| t.position.y).collect();
            let assignees: Vec<Option<DbId>> =
                tasks.iter().map(|t| t.assignee_id.clone()).collect();
            let parents: Vec<Option<DbId>> = tasks.iter().map(|t| t.parent_id.clone()).collect();
            let done_bys: Vec<Timestamp> = tasks.iter().map(|t| t.done_by).collect();

            let result = sqlx::query(
                "INSERT INTO tasks
                    (id, project_id, type, title, description, status, priority, label,
                     position_x, position_y, assignee_id, parent_id, done_by)
                 SELECT * FROM UNNEST(
                    $1::text[], $2::text[], $3::text[], $4::text[], $5::text[], $6::text[],
                    $7::text[], $8::text[], $9::float8[], $10::float8[], $11::text[],
                    $12::text[], $13::timestamptz[])
                 ON CONFLICT (id) DO UPDATE SET
                    description = EXCLUDED.description,
                    type = EXCLUDED.type,
                    title = EXCLUDED.title,
                    parent_id = EXCLUDED.parent_id,
                    project_id = EXCLUDED.project_id,
                    done_by = EXCLUDED.done_by,
                    assignee_id = EXCLUDED.assignee_id,
                    status = EXCLUDED.status,
                    label = EXCLUDED.label,
                    priority = EXCLUDED.priority
                 WHERE tasks.project_id = EXCLUDED.project_id",
            )
            .bind(&ids)
            .bind(&project_ids)
            .bind(&types)
            .bind(&titles)
            .bind(&descriptions)
            .bind(&statuses)
            .bind(&priorities)
            .bind(&labels)
            .bind(&xs)
            .bind(&ys)
            .bind(&assignees)
            .bind(&parents)
            .bind(&done_bys)
            .execute(&mut *tx)
            .await?;

            tasks_written = result.rows_affected();
            if tasks_written < tasks.len() as u64 {
                tracing::warn!(
                    project_id,
                    submitted = tasks.len(),
                    written = tasks_written,
                    "Task ids owned by another project; rolling back save"
                );
                tx.rollback().await?;
                return Ok(GraphSaveOutcome::ForeignIds { entity: "Task" });
            }

            let (foreign_parents,): (i64,) = sqlx::query_as(
                "SELECT COUNT(*)
                 FROM tasks c
                 JOIN tasks p ON p.id = c.parent_id
                 WHERE c.id = ANY($1) AND p.project_id <> c.project_id",
            )
            .bind(&ids)
            .fetch_one(&mut *tx)
            .await?;
            if foreign_parents > 0 {
                tracing::warn!(
                    project_id,
                    foreign_parents,
                    "Tasks parented under another project; rolling back save"
                );
                tx.rollback().await?;
                return Ok(GraphSaveOutcome::ForeignIds {
                    entity: "Task parent",
                });
            }
        }

        let mut edges_written = 0;
        if !edges.is_empty() {
            let ids: Vec<DbId> = edges.iter().map(|e| e.id.clone()).collect();
            let project_ids: Vec<DbId> = edges.iter().map(|e| e.project_id.clone()).collect();
            let sources: Vec<DbId> = edges.iter().map(|e| e.source.clone()).collect();
            let targets: Vec<DbId> = edges.iter().map(|e| e.target.clone()).collect();

            let result = sqlx::query(
                "INSERT INTO edges (id, project_id, source, target)
                 SELECT * FROM UNNEST($1::text[], $2::text[], $3::text[], $4::text[])
                 ON CONFLICT (id) DO UPDATE SET
                    source = EXCLUDED.source,
                    target = EXCLUDED.target
                 WHERE edges.project_id = EXCLUDED.project_id",
            )
            .bind(&ids)
            .bind(&project_ids)
            .bind(&sources)
            .bind(&targets)
            .execute(&mut *tx)
            .await?;

            edges_written = result.rows_affected();
            if edges_written < edges.len() as u64 {
                tracing::warn!(
                    project_id,
                    submitted = edges.len(),
                    written = edges_written,
                    "Edge ids owned by another project; rolling back save"
                );
                tx.rollback().await?;
                return Ok(GraphSaveOutcome::ForeignIds { entity: "Edge" });
            }

            // Endpoints that do not exist at all are caught by the deferred
            // foreign keys at commit.
            let (foreign_endpoints,): (i64,) = sqlx::query_as(
                "SELECT COUNT(*)
                 FROM edges e
                 JOIN tasks s ON s.id = e.source
                 JOIN tasks t ON t.id = e.target
                 WHERE e.id = ANY($1)
                   AND (s.project_id <> e.project_id OR t.project_id <> e.project_id)",
            )
            .bind(&ids)
            .fetch_one(&mut *tx)
            .await?;
            if foreign_endpoints > 0 {
                tracing::warn!(
                    project_id,
                    foreign_endpoints,
                    "Edges link tasks of another project; rolling back save"
                );
                tx.rollback().await?;
                return Ok(GraphSaveOutcome::ForeignIds {
                    entity: "Edge endpoint",
                });
            }
        }

        tx.commit().await?;

        Ok(GraphSaveOutcome::Saved {
            tasks: tasks_written,
            edges: edges_written,
        })
    }
}
