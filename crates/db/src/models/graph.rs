//! Canvas-facing task graph shapes.
//!
//! The visual editor exchanges tasks as *nodes*: an envelope carrying the
//! canvas placement with the task payload nested under `data`. These types
//! convert between that shape and the flat `tasks` rows.

use amaxa_core::task_graph::{
    normalize_parent_id, validate_position, Position, TaskPriority, TaskStatus, DEFAULT_TASK_TYPE,
};
use amaxa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::edge::{Edge, EdgeInput};
use super::task::TaskWithAssignee;

fn default_node_type() -> String {
    DEFAULT_TASK_TYPE.to_string()
}

/// Assignee display fields embedded in a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AssigneeSummary {
    #[validate(length(min = 1))]
    pub id: DbId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub id: DbId,
}

/// Task payload nested under a node's `data` key.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskNodeData {
    #[serde(default)]
    pub id: Option<DbId>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub label: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub description: String,
    #[serde(default)]
    #[validate(nested)]
    pub assignee: Option<AssigneeSummary>,
    #[serde(default)]
    pub assignee_name: Option<String>,
    #[serde(default)]
    pub parent: Option<ParentRef>,
    #[validate(length(min = 1))]
    pub project_id: DbId,
    pub done_by: Timestamp,
}

/// A task as a canvas node.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskNode {
    #[validate(length(min = 1, max = 128))]
    pub id: DbId,
    #[serde(rename = "type", default = "default_node_type")]
    #[validate(length(min = 1, max = 64))]
    pub node_type: String,
    /// `""` or absent means "no parent".
    #[serde(default)]
    pub parent_id: Option<DbId>,
    #[validate(custom(function = "validate_position"))]
    pub position: Position,
    #[validate(nested)]
    pub data: TaskNodeData,
}

impl TaskNode {
    /// Flatten the node into the column values written by a batch save.
    ///
    /// The top-level `parent_id` wins; `data.parent` is only consulted when
    /// the envelope carries none.
    pub fn to_upsert(&self) -> TaskUpsert {
        let parent_id = normalize_parent_id(self.parent_id.as_deref()).or_else(|| {
            normalize_parent_id(self.data.parent.as_ref().map(|p| p.id.as_str()))
        });

        TaskUpsert {
            id: self.id.clone(),
            project_id: self.data.project_id.clone(),
            task_type: self.node_type.clone(),
            title: self.data.title.clone(),
            description: self.data.description.clone(),
            status: self.data.status,
            priority: self.data.priority,
            label: self.data.label.clone(),
            position: self.position,
            assignee_id: self.data.assignee.as_ref().map(|a| a.id.clone()),
            parent_id,
            done_by: self.data.done_by,
        }
    }
}

impl From<TaskWithAssignee> for TaskNode {
    fn from(row: TaskWithAssignee) -> Self {
        let task = row.task;
        let position = task.position();
        let assignee = task.assignee_id.clone().map(|id| AssigneeSummary {
            id,
            name: row.assignee_name.clone(),
            image: row.assignee_image,
        });
        let parent = task.parent_id.clone().map(|id| ParentRef { id });

        TaskNode {
            id: task.id.clone(),
            node_type: task.task_type,
            parent_id: task.parent_id,
            position,
            data: TaskNodeData {
                id: Some(task.id),
                status: task.status,
                priority: task.priority,
                label: task.label,
                title: task.title,
                description: task.description,
                assignee,
                assignee_name: row.assignee_name,
                parent,
                project_id: task.project_id,
                done_by: task.done_by,
            },
        }
    }
}

/// Column values for one task in a batch upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskUpsert {
    pub id: DbId,
    pub project_id: DbId,
    pub task_type: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub label: Option<String>,
    pub position: Position,
    pub assignee_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    pub done_by: Timestamp,
}

/// All tasks and edges of one project, read from a single snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectGraph {
    pub tasks: Vec<TaskNode>,
    pub edges: Vec<Edge>,
}

/// Request body for a batch graph save.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveGraph {
    /// Optional; when present it must match the project in the path.
    #[serde(default)]
    pub project_id: Option<DbId>,
    #[serde(default)]
    #[validate(nested)]
    pub tasks: Vec<TaskNode>,
    #[serde(default)]
    #[validate(nested)]
    pub edges: Vec<EdgeInput>,
}

/// Result of a batch save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphSaveOutcome {
    /// Every submitted row was written.
    Saved { tasks: u64, edges: u64 },
    /// Some submitted id already belongs to another project; nothing was
    /// written.
    ForeignIds { entity: &'static str },
}

/// Counts returned to the client after a save.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GraphSaveSummary {
    pub tasks: u64,
    pub edges: u64,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    fn node_json(parent_id: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "t1",
            "parent_id": parent_id,
            "position": {"x": 10.0, "y": 20.0},
            "data": {
                "title": "Design",
                "description": "",
                "status": "done",
                "assignee": {"id": "u1", "name": "Ann", "image": null},
                "project_id": "p1",
                "parent": {"id": "t0"},
                "done_by": "2026-03-01T00:00:00Z"
            }
        })
    }

    #[test]
    fn node_defaults_type_and_priority() {
        let node: TaskNode = serde_json::from_value(node_json(json!("t0"))).unwrap();
        assert_eq!(node.node_type, DEFAULT_TASK_TYPE);
        assert_eq!(node.data.priority, TaskPriority::Low);
        assert!(node.validate().is_ok());
    }

    #[test]
    fn upsert_flattens_node() {
        let node: TaskNode = serde_json::from_value(node_json(json!("t0"))).unwrap();
        let row = node.to_upsert();
        assert_eq!(row.id, "t1");
        assert_eq!(row.project_id, "p1");
        assert_eq!(row.status, TaskStatus::Done);
        assert_eq!(row.assignee_id.as_deref(), Some("u1"));
        assert_eq!(row.parent_id.as_deref(), Some("t0"));
        assert_eq!(row.position, Position::new(10.0, 20.0));
        assert_eq!(row.done_by, Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn blank_parent_falls_back_to_data_parent() {
        let node: TaskNode = serde_json::from_value(node_json(json!(""))).unwrap();
        assert_eq!(node.to_upsert().parent_id.as_deref(), Some("t0"));
    }

    #[test]
    fn no_parent_anywhere_is_none() {
        let mut value = node_json(json!(""));
        value["data"]["parent"] = json!({"id": ""});
        let node: TaskNode = serde_json::from_value(value).unwrap();
        assert_eq!(node.to_upsert().parent_id, None);
    }

    #[test]
    fn blank_title_fails_validation() {
        let mut value = node_json(json!(null));
        value["data"]["title"] = json!("");
        let node: TaskNode = serde_json::from_value(value).unwrap();
        assert!(node.validate().is_err());
    }

    #[test]
    fn unknown_status_fails_to_deserialize() {
        let mut value = node_json(json!(null));
        value["data"]["status"] = json!("finished");
        assert!(serde_json::from_value::<TaskNode>(value).is_err());
    }
}
