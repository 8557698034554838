//! Dashboard aggregation rows.

use amaxa_core::stats::month_label;
use amaxa_core::task_graph::{TaskPriority, TaskStatus};
use amaxa_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// Raw `(month bucket, count)` row as returned by the time-series queries.
#[derive(Debug, Clone, FromRow)]
pub struct MonthBucketRow {
    pub month_start: Timestamp,
    pub count: i64,
}

/// Task count for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTaskCount {
    /// Full English month name, e.g. `"January"`.
    pub month: String,
    pub month_start: Timestamp,
    pub count: i64,
}

impl From<MonthBucketRow> for MonthlyTaskCount {
    fn from(row: MonthBucketRow) -> Self {
        Self {
            month: month_label(row.month_start),
            month_start: row.month_start,
            count: row.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct PriorityCount {
    #[sqlx(try_from = "String")]
    pub priority: TaskPriority,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct StatusCount {
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    pub count: i64,
}

/// Number of tasks whose position falls inside one canvas grid cell.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct GridCellCount {
    pub cell_x: i64,
    pub cell_y: i64,
    pub count: i64,
}
