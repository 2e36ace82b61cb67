//! Pluggable record validation.
//!
//! The engine only needs `validate(body) -> Ok(T) | Err(message)`. Anything
//! implementing [`Schema`] can be plugged in, including plain closures:
//!
//! ```
//! use engagement_core::schema::Schema;
//! use engagement_core::ValidationError;
//!
//! let reject_all = |_: &serde_json::Value| -> Result<u8, ValidationError> {
//!     Err("nope".into())
//! };
//! assert_eq!(reject_all.validate(&serde_json::json!({})).unwrap_err().message, "nope");
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ValidationError;
use crate::types::{CommonConfig, PartnerConfig};

/// Validates one raw JSON body into a typed record.
pub trait Schema<T>: Send + Sync {
    fn validate(&self, body: &Value) -> Result<T, ValidationError>;
}

impl<T, F> Schema<T> for F
where
    F: Fn(&Value) -> Result<T, ValidationError> + Send + Sync,
{
    fn validate(&self, body: &Value) -> Result<T, ValidationError> {
        self(body)
    }
}

fn decode<T: DeserializeOwned>(body: &Value) -> Result<T, ValidationError> {
    T::deserialize(body).map_err(|e| ValidationError::new(e.to_string()))
}

/// Default schema for the common record: structural decode plus the
/// week-start range check.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonConfigSchema;

impl Schema<CommonConfig> for CommonConfigSchema {
    fn validate(&self, body: &Value) -> Result<CommonConfig, ValidationError> {
        let common: CommonConfig = decode(body)?;
        let shifts = common.shifts_per_day();
        if shifts > 0 && common.week_start.shift_index >= shifts {
            return Err(ValidationError::new(format!(
                "weekStart.shiftIndex {} out of range for {} shifts",
                common.week_start.shift_index, shifts
            )));
        }
        Ok(common)
    }
}

/// Default schema for a partner record: structural decode plus numeric
/// ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartnerConfigSchema;

impl Schema<PartnerConfig> for PartnerConfigSchema {
    fn validate(&self, body: &Value) -> Result<PartnerConfig, ValidationError> {
        let partner: PartnerConfig = decode(body)?;
        if !(partner.target_cycle_time > 0.0) {
            return Err(ValidationError::new(format!(
                "targetCycleTime must be greater than 0, got {}",
                partner.target_cycle_time
            )));
        }
        if !(0.0..=1.0).contains(&partner.target_efficiency) {
            return Err(ValidationError::new(format!(
                "targetEfficiency must be within [0, 1], got {}",
                partner.target_efficiency
            )));
        }
        Ok(partner)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;
    use serde_json::json;

    use super::*;

    fn common_body(shift_index: usize) -> Value {
        json!({
            "partnerGroups": { "_": ["_", "_"] },
            "shiftStartTimes": ["a", "b", "c"],
            "weekStart": { "day": "Wed", "shiftIndex": shift_index }
        })
    }

    #[test]
    fn common_schema_accepts_valid_record() {
        let common = CommonConfigSchema.validate(&common_body(2)).expect("valid");
        assert_eq!(common.week_start.day, Weekday::Wed);
    }

    #[test]
    fn common_schema_rejects_shift_index_out_of_range() {
        let err = CommonConfigSchema.validate(&common_body(3)).unwrap_err();
        assert!(err.message.contains("shiftIndex"), "got: {err}");
    }

    #[test]
    fn common_schema_ignores_shift_index_without_shifts() {
        let body = json!({
            "partnerGroups": {},
            "shiftStartTimes": [],
            "weekStart": { "day": "Monday", "shiftIndex": 0 }
        });
        assert!(CommonConfigSchema.validate(&body).is_ok());
    }

    #[test]
    fn common_schema_rejects_missing_fields() {
        let err = CommonConfigSchema.validate(&json!({})).unwrap_err();
        assert!(err.message.contains("partnerGroups"), "got: {err}");
    }

    #[test]
    fn partner_schema_checks_ranges() {
        let ok = json!({
            "title": "Press 1",
            "shiftEngaged": [true, false],
            "targetCycleTime": 12.3,
            "targetEfficiency": 0.456
        });
        assert_eq!(PartnerConfigSchema.validate(&ok).expect("valid").title, "Press 1");

        let mut zero_cycle = ok.clone();
        zero_cycle["targetCycleTime"] = json!(0.0);
        assert!(PartnerConfigSchema.validate(&zero_cycle).is_err());

        let mut over_one = ok;
        over_one["targetEfficiency"] = json!(1.5);
        assert!(PartnerConfigSchema.validate(&over_one).is_err());
    }
}
