//! Domain types for the engagement configuration records.
//!
//! Wire names follow the configuration API (camelCase); Rust field names are
//! snake_case. Every record is serializable/deserializable via serde.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a zone (a group of partners sharing one common
/// configuration).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneName(pub String);

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ZoneName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ZoneName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed key for a partner (a manufacturing line) in the
/// configuration API.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartnerKey(pub String);

impl fmt::Display for PartnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PartnerKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PartnerKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Common configuration
// ---------------------------------------------------------------------------

/// First shift of the reporting week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekStart {
    /// Accepts full (`"Wednesday"`) or abbreviated (`"Wed"`) names.
    pub day: Weekday,
    /// Index into `shift_start_times` of the shift opening the week.
    pub shift_index: usize,
}

/// The shared record underlying every zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonConfig {
    /// Zone -> partner keys. Order within a group is the row order and may
    /// contain the same key more than once.
    pub partner_groups: BTreeMap<ZoneName, Vec<PartnerKey>>,
    /// One label per shift of a day.
    pub shift_start_times: Vec<String>,
    pub week_start: WeekStart,
}

impl CommonConfig {
    /// Ordered partner keys of `zone`, or `None` for an unknown zone.
    pub fn partners(&self, zone: &ZoneName) -> Option<&[PartnerKey]> {
        self.partner_groups.get(zone).map(Vec::as_slice)
    }

    /// Number of shifts per day.
    pub fn shifts_per_day(&self) -> usize {
        self.shift_start_times.len()
    }

    /// Number of shift slots in a week (`7 * shifts_per_day`).
    pub fn slots_per_week(&self) -> usize {
        7 * self.shifts_per_day()
    }
}

// ---------------------------------------------------------------------------
// Partner configuration
// ---------------------------------------------------------------------------

/// Per-partner editable record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerConfig {
    pub title: String,
    /// One flag per (day, shift) slot, day-major, in nominal calendar order
    /// (not the rotated heading order).
    pub shift_engaged: Vec<bool>,
    /// Target time per unit, strictly positive.
    pub target_cycle_time: f64,
    /// Fraction in `[0, 1]`.
    pub target_efficiency: f64,
}

/// Body of `PATCH {api}/{partnerKey}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerPatch {
    pub shift_engaged: Vec<bool>,
    pub target_cycle_time: f64,
    pub target_efficiency: f64,
}

// ---------------------------------------------------------------------------
// Percent conversion
// ---------------------------------------------------------------------------

/// Fraction (`0.456`) to the percentage shown in the edit surface (`45.6`).
///
/// Rounded to 10 decimal places so that `0.456 * 100` reads back as `45.6`.
pub fn fraction_to_percent(fraction: f64) -> f64 {
    round_decimals(fraction * 100.0, 10)
}

/// Percentage from the edit surface back to the stored fraction.
pub fn percent_to_fraction(percent: f64) -> f64 {
    round_decimals(percent / 100.0, 12)
}

fn round_decimals(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(ZoneName::from("press").to_string(), "press");
        assert_eq!(PartnerKey::from("line-1").to_string(), "line-1");
    }

    #[test]
    fn common_config_reads_camel_case_wire_format() {
        let body = json!({
            "partnerGroups": { "press": ["abcd", "efgh", "abcd"] },
            "shiftStartTimes": ["06", "14", "22"],
            "weekStart": { "day": "Wednesday", "shiftIndex": 1 }
        });
        let common: CommonConfig = serde_json::from_value(body).expect("deserialize");
        assert_eq!(common.week_start.day, Weekday::Wed);
        assert_eq!(common.week_start.shift_index, 1);
        assert_eq!(common.slots_per_week(), 21);
        let keys: Vec<_> = common
            .partners(&ZoneName::from("press"))
            .expect("zone")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(keys, ["abcd", "efgh", "abcd"]);
        assert!(common.partners(&ZoneName::from("paint")).is_none());
    }

    #[test]
    fn patch_writes_camel_case_wire_format() {
        let patch = PartnerPatch {
            shift_engaged: vec![true, false],
            target_cycle_time: 60.0,
            target_efficiency: 1.0,
        };
        assert_eq!(
            serde_json::to_value(&patch).expect("serialize"),
            json!({ "shiftEngaged": [true, false], "targetCycleTime": 60.0, "targetEfficiency": 1.0 })
        );
    }

    #[test]
    fn percent_conversion_reads_back_cleanly() {
        assert_eq!(fraction_to_percent(0.456), 45.6);
        assert_eq!(fraction_to_percent(0.678), 67.8);
        assert_eq!(fraction_to_percent(1.0), 100.0);
        assert_eq!(percent_to_fraction(45.6), 0.456);
        assert_eq!(percent_to_fraction(100.0), 1.0);
    }
}
