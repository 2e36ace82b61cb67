//! Aggregation engine: owns the zone's derived state and sequences
//! fetch -> heading/table -> edit -> save.
//!
//! Async work is split into `begin_*` (mutates state, hands out a ticket),
//! the I/O itself (borrows nothing from the engine) and `apply_*` (installs
//! the result). Every ticket carries the generation it was issued under; a
//! completion whose generation is no longer current is discarded, so a late
//! response for a superseded zone never touches the current table.

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::mpsc;

use engagement_core::{
    build_table, gate::RowValidity, heading, EditError, HeadingCell, PartnerKey, PartnerTable,
    Row, ZoneName,
};

use crate::error::EngineError;
use crate::fetcher::ConfigFetcher;
use crate::save::{SaveCoordinator, SaveReport};

/// Title extension announced once when the screen is mounted.
pub const TITLE_EXTENSION: &str = "Lines Engagement";

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    TitleExtension { title: String },
    Loaded { zone: ZoneName, rows: usize },
    LoadFailed { zone: ZoneName, message: String },
    Saved { zone: ZoneName, rows: usize },
    SaveFailed { zone: ZoneName, reason: String },
}

/// Whether a completion was installed or discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    Stale,
}

/// Issued by [`ConfigAggregationEngine::begin_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    zone: ZoneName,
}

impl LoadTicket {
    pub fn zone(&self) -> &ZoneName {
        &self.zone
    }
}

/// Heading and table of one zone.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedZone {
    pub heading: Vec<HeadingCell>,
    pub table: PartnerTable,
}

/// Settled result of [`fetch_zone`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    generation: u64,
    zone: ZoneName,
    pub result: Result<LoadedZone, EngineError>,
}

/// Issued by [`ConfigAggregationEngine::begin_save`]; holds the rows as they
/// were when the save started.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveTicket {
    generation: u64,
    edit_seq: u64,
    rows: Vec<Row>,
}

impl SaveTicket {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

/// Fetch the common record, then every partner of `ticket.zone`
/// concurrently, and assemble the heading and table.
///
/// Settles only after every partner request has settled.
pub async fn fetch_zone(fetcher: &ConfigFetcher, ticket: LoadTicket) -> LoadOutcome {
    let LoadTicket { generation, zone } = ticket;
    let result = fetch_zone_inner(fetcher, &zone).await;
    LoadOutcome {
        generation,
        zone,
        result,
    }
}

async fn fetch_zone_inner(
    fetcher: &ConfigFetcher,
    zone: &ZoneName,
) -> Result<LoadedZone, EngineError> {
    let common = fetcher.fetch_common().await?;
    let keys: Vec<PartnerKey> = common
        .partners(zone)
        .ok_or_else(|| EngineError::UnknownZone(zone.clone()))?
        .to_vec();
    tracing::debug!(%zone, partners = keys.len(), "common configuration validated");

    let results = join_all(keys.iter().map(|key| fetcher.fetch_partner(key))).await;
    let table = build_table(&keys, results)?;
    Ok(LoadedZone {
        heading: heading::heading_for(&common),
        table,
    })
}

/// One row as exposed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    #[serde(flatten)]
    pub row: Row,
    pub validity: RowValidity,
}

/// Upward interface: everything a screen needs to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementView {
    pub zone: Option<ZoneName>,
    pub heading: Vec<HeadingCell>,
    pub rows: Vec<RowView>,
    pub save_enabled: bool,
    pub error: Option<String>,
    pub loading: bool,
    pub saving: bool,
}

/// Owns the derived state of one mounted zone.
pub struct ConfigAggregationEngine {
    fetcher: ConfigFetcher,
    saver: SaveCoordinator,
    generation: u64,
    edit_seq: u64,
    zone: Option<ZoneName>,
    heading: Vec<HeadingCell>,
    table: Option<PartnerTable>,
    error: Option<String>,
    loading: bool,
    saving: bool,
    // Set after a save attempt; cleared by the next edit.
    awaiting_edit: bool,
    title_announced: bool,
    events: Option<mpsc::UnboundedSender<EngineEvent>>,
}

impl ConfigAggregationEngine {
    pub fn new(fetcher: ConfigFetcher) -> Self {
        let saver = SaveCoordinator::new(fetcher.transport().clone());
        Self {
            fetcher,
            saver,
            generation: 0,
            edit_seq: 0,
            zone: None,
            heading: Vec::new(),
            table: None,
            error: None,
            loading: false,
            saving: false,
            awaiting_edit: false,
            title_announced: false,
            events: None,
        }
    }

    /// Receive [`EngineEvent`]s from now on. Replaces any earlier subscriber.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<EngineEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    pub fn fetcher(&self) -> &ConfigFetcher {
        &self.fetcher
    }

    pub fn saver(&self) -> &SaveCoordinator {
        &self.saver
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    /// Announce the title extension (first mount only), then load `zone`.
    pub async fn mount(&mut self, zone: impl Into<ZoneName>) -> Result<(), EngineError> {
        if !self.title_announced {
            self.title_announced = true;
            self.emit(EngineEvent::TitleExtension {
                title: TITLE_EXTENSION.to_string(),
            });
        }
        self.load(zone).await
    }

    /// Load `zone`, replacing any derived state. The failure, if any, is
    /// also kept as the view's error.
    pub async fn load(&mut self, zone: impl Into<ZoneName>) -> Result<(), EngineError> {
        let ticket = self.begin_load(zone);
        let fetcher = self.fetcher.clone();
        let outcome = fetch_zone(&fetcher, ticket).await;
        let result = outcome.result.clone().map(|_| ());
        self.apply_load(outcome);
        result
    }

    /// Start a new generation for `zone`. Derived state is cleared and any
    /// in-flight load or save becomes stale.
    pub fn begin_load(&mut self, zone: impl Into<ZoneName>) -> LoadTicket {
        let zone = zone.into();
        self.generation += 1;
        self.zone = Some(zone.clone());
        self.heading.clear();
        self.table = None;
        self.error = None;
        self.loading = true;
        self.saving = false;
        self.awaiting_edit = false;
        tracing::debug!(%zone, generation = self.generation, "load started");
        LoadTicket {
            generation: self.generation,
            zone,
        }
    }

    pub fn apply_load(&mut self, outcome: LoadOutcome) -> Applied {
        if outcome.generation != self.generation {
            tracing::warn!(
                zone = %outcome.zone,
                generation = outcome.generation,
                current = self.generation,
                "discarding stale load result"
            );
            return Applied::Stale;
        }

        self.loading = false;
        match outcome.result {
            Ok(loaded) => {
                let rows = loaded.table.len();
                tracing::info!(zone = %outcome.zone, rows, "zone loaded");
                self.heading = loaded.heading;
                self.table = Some(loaded.table);
                self.emit(EngineEvent::Loaded {
                    zone: outcome.zone,
                    rows,
                });
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(zone = %outcome.zone, error = %message, "zone load failed");
                self.error = Some(message.clone());
                self.emit(EngineEvent::LoadFailed {
                    zone: outcome.zone,
                    message,
                });
            }
        }
        Applied::Current
    }

    // -----------------------------------------------------------------------
    // Edit
    // -----------------------------------------------------------------------

    pub fn set_cycle_time(&mut self, row: usize, value: f64) -> Result<(), EngineError> {
        self.edit(|table| table.set_cycle_time(row, value))
    }

    /// `percent` is the edit-surface value (`0..=100`).
    pub fn set_efficiency_percent(&mut self, row: usize, percent: f64) -> Result<(), EngineError> {
        self.edit(|table| table.set_efficiency_percent(row, percent))
    }

    pub fn set_shift(&mut self, row: usize, slot: usize, engaged: bool) -> Result<(), EngineError> {
        self.edit(|table| table.set_shift(row, slot, engaged))
    }

    pub fn toggle_shift(&mut self, row: usize, slot: usize) -> Result<bool, EngineError> {
        self.edit(|table| table.toggle_shift(row, slot))
    }

    pub fn check_all(&mut self) -> Result<(), EngineError> {
        self.edit(|table| {
            table.check_all();
            Ok(())
        })
    }

    pub fn uncheck_all(&mut self) -> Result<(), EngineError> {
        self.edit(|table| {
            table.uncheck_all();
            Ok(())
        })
    }

    fn edit<T>(
        &mut self,
        apply: impl FnOnce(&mut PartnerTable) -> Result<T, EditError>,
    ) -> Result<T, EngineError> {
        let table = self.table.as_mut().ok_or(EngineError::NotLoaded)?;
        let value = apply(table)?;
        self.edit_seq += 1;
        self.awaiting_edit = false;
        Ok(value)
    }

    // -----------------------------------------------------------------------
    // Save
    // -----------------------------------------------------------------------

    /// True iff a table is loaded, nothing is in flight, the last save
    /// attempt has been followed by an edit and every field is valid.
    pub fn save_enabled(&self) -> bool {
        match &self.table {
            Some(table) => {
                !self.loading && !self.saving && !self.awaiting_edit && table.all_valid()
            }
            None => false,
        }
    }

    /// Save every row. Partial success is kept; the first failure's reason
    /// is returned as [`EngineError::Save`].
    pub async fn save(&mut self) -> Result<(), EngineError> {
        let ticket = self.begin_save()?;
        let saver = self.saver.clone();
        let report = saver.save(ticket.rows()).await;
        let result = report.clone().into_result().map_err(EngineError::from);
        self.apply_save(ticket, report);
        result
    }

    pub fn begin_save(&mut self) -> Result<SaveTicket, EngineError> {
        let table = self.table.as_ref().ok_or(EngineError::NotLoaded)?;
        if !self.save_enabled() {
            return Err(EngineError::SaveDisabled);
        }
        let rows = table.rows().to_vec();
        self.saving = true;
        Ok(SaveTicket {
            generation: self.generation,
            edit_seq: self.edit_seq,
            rows,
        })
    }

    /// Install a save outcome. Rows that saved successfully and were not
    /// edited meanwhile become clean; failed rows stay dirty. Save stays
    /// disabled until the next edit either way.
    pub fn apply_save(&mut self, ticket: SaveTicket, report: SaveReport) -> Applied {
        if ticket.generation != self.generation {
            tracing::warn!(
                generation = ticket.generation,
                current = self.generation,
                "discarding stale save result"
            );
            return Applied::Stale;
        }

        self.saving = false;
        if ticket.edit_seq == self.edit_seq {
            self.awaiting_edit = true;
        }

        if let Some(table) = self.table.as_mut() {
            for result in report.results.iter().filter(|r| r.outcome.is_ok()) {
                let sent = ticket.rows.get(result.row).map(Row::patch);
                let current = table.rows().get(result.row).map(Row::patch);
                if sent.is_some() && sent == current {
                    table.mark_clean(result.row);
                }
            }
        }

        let zone = self.zone.clone().unwrap_or_else(|| ZoneName::from(""));
        match report.into_result() {
            Ok(()) => {
                tracing::info!(%zone, rows = ticket.rows.len(), "configuration saved");
                self.emit(EngineEvent::Saved {
                    zone,
                    rows: ticket.rows.len(),
                });
            }
            Err(err) => {
                tracing::warn!(%zone, failed = err.failed, total = err.total, reason = %err.first_reason, "save failed");
                self.emit(EngineEvent::SaveFailed {
                    zone,
                    reason: err.first_reason,
                });
            }
        }
        Applied::Current
    }

    // -----------------------------------------------------------------------
    // View
    // -----------------------------------------------------------------------

    pub fn zone(&self) -> Option<&ZoneName> {
        self.zone.as_ref()
    }

    pub fn heading(&self) -> &[HeadingCell] {
        &self.heading
    }

    pub fn rows(&self) -> &[Row] {
        self.table.as_ref().map(PartnerTable::rows).unwrap_or(&[])
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn view(&self) -> EngagementView {
        EngagementView {
            zone: self.zone.clone(),
            heading: self.heading.clone(),
            rows: self
                .rows()
                .iter()
                .map(|row| RowView {
                    row: row.clone(),
                    validity: row.validity(),
                })
                .collect(),
            save_enabled: self.save_enabled(),
            error: self.error.clone(),
            loading: self.loading,
            saving: self.saving,
        }
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}
