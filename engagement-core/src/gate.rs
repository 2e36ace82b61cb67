//! Edit validity rules gating the save action.
//!
//! Pure and total: every call recomputes from the rows it is given.

use std::fmt;

use serde::Serialize;

use crate::table::Row;

/// Cycle time is valid iff strictly positive.
pub fn cycle_time_valid(cycle_time: f64) -> bool {
    cycle_time > 0.0
}

/// Efficiency (as a percentage) is valid iff within `[0, 100]`.
pub fn efficiency_percent_valid(percent: f64) -> bool {
    (0.0..=100.0).contains(&percent)
}

/// Per-field validity of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowValidity {
    pub cycle_time: bool,
    pub efficiency: bool,
}

impl RowValidity {
    pub fn of(row: &Row) -> Self {
        Self {
            cycle_time: cycle_time_valid(row.target_cycle_time),
            efficiency: efficiency_percent_valid(row.efficiency_percent),
        }
    }

    pub fn is_valid(self) -> bool {
        self.cycle_time && self.efficiency
    }
}

/// The field an issue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CycleTime,
    Efficiency,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::CycleTime => write!(f, "cycle time"),
            Field::Efficiency => write!(f, "efficiency"),
        }
    }
}

/// One invalid field, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub row: usize,
    pub title: String,
    pub field: Field,
    pub value: f64,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = match self.field {
            Field::CycleTime => "must be greater than 0",
            Field::Efficiency => "must be between 0 and 100",
        };
        write!(
            f,
            "row {} ({}): {} {} {rule}",
            self.row, self.title, self.field, self.value
        )
    }
}

/// True iff every field of every row is valid.
pub fn save_allowed(rows: &[Row]) -> bool {
    rows.iter().all(|row| RowValidity::of(row).is_valid())
}

/// Every invalid field across `rows`, in row order.
pub fn issues(rows: &[Row]) -> Vec<ValidationIssue> {
    let mut found = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let validity = RowValidity::of(row);
        if !validity.cycle_time {
            found.push(ValidationIssue {
                row: index,
                title: row.title.clone(),
                field: Field::CycleTime,
                value: row.target_cycle_time,
            });
        }
        if !validity.efficiency {
            found.push(ValidationIssue {
                row: index,
                title: row.title.clone(),
                field: Field::Efficiency,
                value: row.efficiency_percent,
            });
        }
    }
    found
}
