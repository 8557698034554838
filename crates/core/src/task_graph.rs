//! Task graph enums, canvas defaults, and validation rules.
//!
//! Lives in `core` (no I/O) so the repository layer, the HTTP handlers and
//! their tests all agree on the same status/priority sets and payload rules.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::ValidationError;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Defaults and limits
// ---------------------------------------------------------------------------

/// Node type assigned when the editor does not send one.
pub const DEFAULT_TASK_TYPE: &str = "task";

/// Maximum number of tasks accepted by a single batch save.
pub const MAX_TASKS_PER_SAVE: usize = 2_000;

/// Maximum number of edges accepted by a single batch save.
pub const MAX_EDGES_PER_SAVE: usize = 4_000;

/// Largest absolute canvas coordinate. Keeps grid-cell indices within
/// `bigint` for every accepted cell size.
pub const MAX_COORDINATE: f64 = 1e9;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Workflow status of a task. Stored as text, guarded by a CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    Tbd,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Done,
        TaskStatus::Tbd,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Tbd => "tbd",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown task status '{s}'")))
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Priority bucket of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    #[default]
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown task priority '{s}'")))
    }
}

impl TryFrom<String> for TaskPriority {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Canvas position
// ---------------------------------------------------------------------------

/// Position of a task node on the editor canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Both coordinates finite and within `±MAX_COORDINATE`.
    pub fn is_on_canvas(&self) -> bool {
        self.is_finite() && self.x.abs() <= MAX_COORDINATE && self.y.abs() <= MAX_COORDINATE
    }
}

/// `validator` hook: reject NaN, infinite and off-canvas coordinates.
pub fn validate_position(position: &Position) -> Result<(), ValidationError> {
    if position.is_on_canvas() {
        Ok(())
    } else {
        let mut err = ValidationError::new("position_range");
        err.message = Some(
            format!("position coordinates must be finite and within ±{MAX_COORDINATE}").into(),
        );
        Err(err)
    }
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Mint a new opaque id for a server-created row.
pub fn new_entity_id() -> DbId {
    uuid::Uuid::new_v4().to_string()
}

/// The editor sends `""` for "no parent". Collapse blank ids to `None`.
pub fn normalize_parent_id(parent_id: Option<&str>) -> Option<DbId> {
    parent_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Return the first id that occurs more than once.
pub fn find_duplicate_id<'a, I>(ids: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

// ---------------------------------------------------------------------------
// Batch payload rules
// ---------------------------------------------------------------------------

/// Ensure every `(id, project_id)` pair in a batch targets `project_id`.
///
/// A batch save is authorised for exactly one project; rows naming another
/// project are rejected before anything is written.
pub fn check_same_project<'a, I>(
    project_id: &str,
    entity: &'static str,
    items: I,
) -> Result<(), CoreError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    for (id, item_project) in items {
        if item_project != project_id {
            return Err(CoreError::Validation(format!(
                "{entity} '{id}' belongs to project '{item_project}', expected '{project_id}'"
            )));
        }
    }
    Ok(())
}

/// Validate batch sizes and id uniqueness for a graph save.
pub fn check_batch_shape<'a, T, E>(task_ids: T, edge_ids: E) -> Result<(), CoreError>
where
    T: IntoIterator<Item = &'a str>,
    E: IntoIterator<Item = &'a str>,
{
    let task_ids: Vec<&str> = task_ids.into_iter().collect();
    let edge_ids: Vec<&str> = edge_ids.into_iter().collect();

    if task_ids.len() > MAX_TASKS_PER_SAVE {
        return Err(CoreError::Validation(format!(
            "Save contains {} tasks, exceeding the maximum of {MAX_TASKS_PER_SAVE}",
            task_ids.len()
        )));
    }
    if edge_ids.len() > MAX_EDGES_PER_SAVE {
        return Err(CoreError::Validation(format!(
            "Save contains {} edges, exceeding the maximum of {MAX_EDGES_PER_SAVE}",
            edge_ids.len()
        )));
    }
    if let Some(id) = find_duplicate_id(task_ids.iter().copied()) {
        return Err(CoreError::Validation(format!("Duplicate task id '{id}' in save")));
    }
    if let Some(id) = find_duplicate_id(edge_ids.iter().copied()) {
        return Err(CoreError::Validation(format!("Duplicate edge id '{id}' in save")));
    }
    Ok(())
}
