//! Rotated weekly heading.
//!
//! The reporting week starts at `week_start.shift_index` of `week_start.day`,
//! so a week of `7 * S` shifts spans eight calendar days: a partial first
//! day, six full days and a partial carry-over holding the shifts that
//! precede the rotation point.

use chrono::Weekday;
use serde::Serialize;

use crate::types::{CommonConfig, WeekStart};

/// Number of cells in a non-empty heading.
pub const HEADING_CELLS: usize = 8;

/// One label segment of the heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingCell {
    pub shifts: Vec<String>,
    /// `None` only for the trailing carry-over cell.
    pub weekday: Option<Weekday>,
}

impl HeadingCell {
    /// Shift labels followed by the abbreviated weekday (`"bcWed"`).
    pub fn label(&self) -> String {
        let mut label = self.shifts.concat();
        if let Some(day) = self.weekday {
            label.push_str(&day.to_string());
        }
        label
    }
}

/// Build the heading for `shift_start_times` rotated at `week_start`.
///
/// Returns no cells when there are no shifts, otherwise exactly
/// [`HEADING_CELLS`]; the last one is emitted even when empty.
pub fn build_heading(shift_start_times: &[String], week_start: WeekStart) -> Vec<HeadingCell> {
    if shift_start_times.is_empty() {
        return Vec::new();
    }

    let split = week_start.shift_index.min(shift_start_times.len());
    let (head, tail) = shift_start_times.split_at(split);

    let mut cells = Vec::with_capacity(HEADING_CELLS);
    cells.push(HeadingCell {
        shifts: tail.to_vec(),
        weekday: Some(week_start.day),
    });

    let mut day = week_start.day;
    for _ in 0..6 {
        day = day.succ();
        cells.push(HeadingCell {
            shifts: shift_start_times.to_vec(),
            weekday: Some(day),
        });
    }

    cells.push(HeadingCell {
        shifts: head.to_vec(),
        weekday: None,
    });
    cells
}

/// [`build_heading`] over a fetched common record.
pub fn heading_for(common: &CommonConfig) -> Vec<HeadingCell> {
    build_heading(&common.shift_start_times, common.week_start)
}
