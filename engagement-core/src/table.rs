//! Partner table: one editable row per listed partner occurrence.

use serde::Serialize;

use crate::error::{EditError, FetchError};
use crate::gate::{self, RowValidity};
use crate::types::{fraction_to_percent, percent_to_fraction, PartnerConfig, PartnerKey, PartnerPatch};

/// Client-side edit state of one partner record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub key: PartnerKey,
    pub title: String,
    pub shift_engaged: Vec<bool>,
    pub target_cycle_time: f64,
    /// `target_efficiency * 100`.
    pub efficiency_percent: f64,
    /// Edited since the last load or successful save.
    pub dirty: bool,
    /// Fraction as last loaded or saved; sent as-is while the percentage
    /// still shows it.
    #[serde(skip)]
    pub(crate) stored_efficiency: f64,
}

impl Row {
    pub fn new(key: PartnerKey, config: PartnerConfig) -> Self {
        Self {
            key,
            title: config.title,
            shift_engaged: config.shift_engaged,
            target_cycle_time: config.target_cycle_time,
            efficiency_percent: fraction_to_percent(config.target_efficiency),
            dirty: false,
            stored_efficiency: config.target_efficiency,
        }
    }

    pub fn validity(&self) -> RowValidity {
        RowValidity::of(self)
    }

    /// The update body for this row, efficiency back as a fraction.
    pub fn patch(&self) -> PartnerPatch {
        PartnerPatch {
            shift_engaged: self.shift_engaged.clone(),
            target_cycle_time: self.target_cycle_time,
            target_efficiency: self.target_efficiency(),
        }
    }

    /// Stored fraction unless the percentage was changed away from it.
    pub fn target_efficiency(&self) -> f64 {
        if self.efficiency_percent == fraction_to_percent(self.stored_efficiency) {
            self.stored_efficiency
        } else {
            percent_to_fraction(self.efficiency_percent)
        }
    }

    pub fn engaged_count(&self) -> usize {
        self.shift_engaged.iter().filter(|engaged| **engaged).count()
    }
}

/// Ordered rows of a zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartnerTable {
    rows: Vec<Row>,
}

/// Assemble the table for `keys` from per-key fetch results.
///
/// `results` must be aligned with `keys` (one entry per listed occurrence).
/// The first failure in listed order fails the whole build.
pub fn build_table(
    keys: &[PartnerKey],
    results: Vec<Result<PartnerConfig, FetchError>>,
) -> Result<PartnerTable, FetchError> {
    debug_assert_eq!(keys.len(), results.len());
    let rows = keys
        .iter()
        .cloned()
        .zip(results)
        .map(|(key, result)| result.map(|config| Row::new(key, config)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PartnerTable { rows })
}

impl PartnerTable {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// See [`gate::save_allowed`].
    pub fn all_valid(&self) -> bool {
        gate::save_allowed(&self.rows)
    }

    pub fn set_cycle_time(&mut self, row: usize, value: f64) -> Result<(), EditError> {
        let row = self.row_mut(row)?;
        row.target_cycle_time = value;
        row.dirty = true;
        Ok(())
    }

    pub fn set_efficiency_percent(&mut self, row: usize, percent: f64) -> Result<(), EditError> {
        let row = self.row_mut(row)?;
        row.efficiency_percent = percent;
        row.dirty = true;
        Ok(())
    }

    pub fn set_shift(&mut self, row: usize, slot: usize, engaged: bool) -> Result<(), EditError> {
        let flag = self.slot_mut(row, slot)?;
        *flag = engaged;
        self.rows[row].dirty = true;
        Ok(())
    }

    /// Flip one slot; returns the new value.
    pub fn toggle_shift(&mut self, row: usize, slot: usize) -> Result<bool, EditError> {
        let flag = self.slot_mut(row, slot)?;
        *flag = !*flag;
        let engaged = *flag;
        self.rows[row].dirty = true;
        Ok(engaged)
    }

    /// Engage every slot of every row.
    pub fn check_all(&mut self) {
        self.fill(true);
    }

    /// Disengage every slot of every row.
    pub fn uncheck_all(&mut self) {
        self.fill(false);
    }

    /// Mark `row` as committed. Out-of-range indices are ignored.
    pub fn mark_clean(&mut self, row: usize) {
        if let Some(row) = self.rows.get_mut(row) {
            row.stored_efficiency = row.target_efficiency();
            row.dirty = false;
        }
    }

    fn fill(&mut self, engaged: bool) {
        for row in &mut self.rows {
            row.shift_engaged.iter_mut().for_each(|flag| *flag = engaged);
            row.dirty = true;
        }
    }

    fn row_mut(&mut self, row: usize) -> Result<&mut Row, EditError> {
        let rows = self.rows.len();
        self.rows
            .get_mut(row)
            .ok_or(EditError::RowOutOfRange { row, rows })
    }

    fn slot_mut(&mut self, row: usize, slot: usize) -> Result<&mut bool, EditError> {
        let target = self.row_mut(row)?;
        let slots = target.shift_engaged.len();
        target
            .shift_engaged
            .get_mut(slot)
            .ok_or(EditError::SlotOutOfRange { row, slot, slots })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;

    fn partner(title: &str) -> PartnerConfig {
        PartnerConfig {
            title: title.to_owned(),
            shift_engaged: vec![true, false],
            target_cycle_time: 60.0,
            target_efficiency: 1.0,
        }
    }

    fn keys(names: &[&str]) -> Vec<PartnerKey> {
        names.iter().map(|k| PartnerKey::from(*k)).collect()
    }

    #[test]
    fn rows_follow_group_order_including_duplicates() {
        let table = build_table(
            &keys(&["efgh", "abcd", "efgh"]),
            vec![Ok(partner("first")), Ok(partner("second")), Ok(partner("third"))],
        )
        .expect("build");
        let order: Vec<_> = table.rows().iter().map(|r| (r.key.0.as_str(), r.title.as_str())).collect();
        assert_eq!(order, [("efgh", "first"), ("abcd", "second"), ("efgh", "third")]);
        assert!(table.rows().iter().all(|r| !r.dirty));
    }

    #[test]
    fn first_failure_in_listed_order_wins() {
        let err = build_table(
            &keys(&["a", "b", "c"]),
            vec![
                Ok(partner("a")),
                Err(HttpError::new(401, "Unauthorized").into()),
                Err(HttpError::new(500, "Internal Server Error").into()),
            ],
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "Unauthorized");
    }

    #[test]
    fn efficiency_is_edited_as_percent_and_saved_as_fraction() {
        let mut config = partner("p");
        config.target_efficiency = 0.456;
        let mut table = build_table(&keys(&["p"]), vec![Ok(config)]).expect("build");
        assert_eq!(table.rows()[0].efficiency_percent, 45.6);

        table.set_efficiency_percent(0, 10.0).expect("edit");
        assert!(table.rows()[0].dirty);
        assert_eq!(table.rows()[0].patch().target_efficiency, 0.1);
    }

    #[test]
    fn unedited_efficiency_is_saved_bit_for_bit() {
        let mut config = partner("p");
        config.target_efficiency = 1.0 / 3.0;
        let mut table = build_table(&keys(&["p"]), vec![Ok(config)]).expect("build");

        table.set_cycle_time(0, 42.0).expect("edit");
        assert_eq!(
            table.rows()[0].patch().target_efficiency.to_bits(),
            (1.0f64 / 3.0).to_bits()
        );

        table.set_efficiency_percent(0, 50.0).expect("edit");
        assert_eq!(table.rows()[0].patch().target_efficiency, 0.5);
        table.mark_clean(0);
        assert_eq!(table.rows()[0].patch().target_efficiency, 0.5);
    }

    #[test]
    fn check_and_uncheck_all_cover_every_slot() {
        let mut table = build_table(&keys(&["_", "_"]), vec![Ok(partner("x")), Ok(partner("y"))])
            .expect("build");
        let engaged = |t: &PartnerTable| t.rows().iter().map(Row::engaged_count).sum::<usize>();
        assert_eq!(engaged(&table), 2);

        table.check_all();
        assert_eq!(engaged(&table), 4);

        table.uncheck_all();
        assert_eq!(engaged(&table), 0);
        assert!(table.rows().iter().all(|r| r.dirty));
    }

    #[test]
    fn slot_edits_are_bounds_checked() {
        let mut table = build_table(&keys(&["_"]), vec![Ok(partner("x"))]).expect("build");
        assert!(table.toggle_shift(0, 1).expect("toggle"));
        table.set_shift(0, 0, false).expect("set");
        assert_eq!(table.rows()[0].shift_engaged, [false, true]);

        assert_eq!(
            table.toggle_shift(0, 2).unwrap_err(),
            EditError::SlotOutOfRange { row: 0, slot: 2, slots: 2 }
        );
        assert_eq!(
            table.set_cycle_time(3, 1.0).unwrap_err(),
            EditError::RowOutOfRange { row: 3, rows: 1 }
        );
    }
}
