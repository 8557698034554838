//! Dashboard statistics helpers: reporting windows, month labels and
//! grid-cell bounds for bucketing task positions.

use chrono::Months;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Rolling window (in months) for the "tasks completed" widget.
pub const DEFAULT_COMPLETED_WINDOW_MONTHS: u32 = 6;

/// Upper bound for a configurable reporting window (10 years).
pub const MAX_WINDOW_MONTHS: u32 = 120;

/// Side length of one canvas grid cell, in canvas units.
pub const DEFAULT_GRID_CELL_SIZE: f64 = 500.0;

/// Smallest accepted grid cell.
pub const MIN_GRID_CELL_SIZE: f64 = 10.0;

/// Largest accepted grid cell.
pub const MAX_GRID_CELL_SIZE: f64 = 100_000.0;

/// Start of a rolling window ending at `now`.
///
/// Falls back to the Unix epoch if subtracting would leave chrono's range.
pub fn window_start(now: Timestamp, months: u32) -> Timestamp {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(Timestamp::UNIX_EPOCH)
}

/// Full English month name for a bucket, e.g. `"January"`.
pub fn month_label(month_start: Timestamp) -> String {
    month_start.format("%B").to_string()
}

/// Validate a reporting window length.
pub fn validate_window_months(months: u32) -> Result<(), CoreError> {
    if months == 0 || months > MAX_WINDOW_MONTHS {
        return Err(CoreError::Validation(format!(
            "Window of {months} months is outside the allowed range [1, {MAX_WINDOW_MONTHS}]"
        )));
    }
    Ok(())
}

/// Validate a grid cell size for position bucketing.
pub fn validate_cell_size(cell_size: f64) -> Result<(), CoreError> {
    if !cell_size.is_finite() || !(MIN_GRID_CELL_SIZE..=MAX_GRID_CELL_SIZE).contains(&cell_size) {
        return Err(CoreError::Validation(format!(
            "Cell size {cell_size} is outside the allowed range \
             [{MIN_GRID_CELL_SIZE}, {MAX_GRID_CELL_SIZE}]"
        )));
    }
    Ok(())
}
