//! Task entity model and DTOs.

use amaxa_core::task_graph::{validate_position, Position, TaskPriority, TaskStatus};
use amaxa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub task_type: String,
    pub title: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    #[sqlx(try_from = "String")]
    pub priority: TaskPriority,
    pub label: Option<String>,
    pub position_x: f64,
    pub position_y: f64,
    pub assignee_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    pub done_by: Timestamp,
    pub created_at: Timestamp,
}

impl Task {
    pub fn position(&self) -> Position {
        Position::new(self.position_x, self.position_y)
    }
}

/// A task joined with its assignee's display fields.
#[derive(Debug, Clone, FromRow)]
pub struct TaskWithAssignee {
    #[sqlx(flatten)]
    pub task: Task,
    pub assignee_name: Option<String>,
    pub assignee_image: Option<String>,
}

/// DTO for creating a single task.
///
/// `parent_id` is required on the wire but may be `""` for a root task.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    #[validate(length(min = 1))]
    pub project_id: DbId,
    pub parent_id: DbId,
    #[validate(length(max = 10000))]
    pub description: String,
    #[validate(custom(function = "validate_position"))]
    pub position: Position,
    #[validate(length(min = 1))]
    pub assignee_id: DbId,
    pub done_by: Timestamp,
    /// Defaults to `"task"`.
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64))]
    pub task_type: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[validate(length(max = 64))]
    pub label: Option<String>,
}

/// DTO for patching a task. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,
    #[validate(custom(function = "validate_position"))]
    pub position: Option<Position>,
    #[validate(length(min = 1))]
    pub assignee_id: Option<DbId>,
    pub status: Option<TaskStatus>,
    pub done_by: Option<Timestamp>,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
}

impl UpdateTask {
    /// `true` when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.position.is_none()
            && self.assignee_id.is_none()
            && self.status.is_none()
            && self.done_by.is_none()
            && self.description.is_none()
            && self.priority.is_none()
    }
}
