//! Engagement core library: domain types, schemas, derived views, errors.
//!
//! - [`types`]: newtypes and the common / partner records
//! - [`error`]: the error taxonomy shared with the engine
//! - [`schema`]: pluggable record validation
//! - [`heading`]: rotated weekly heading
//! - [`table`]: partner rows and their edits
//! - [`gate`]: edit validity rules gating the save action
//! - [`settings`]: on-disk client settings

pub mod error;
pub mod gate;
pub mod heading;
pub mod schema;
pub mod settings;
pub mod table;
pub mod types;

pub use error::{
    AggregateSaveError, EditError, FetchError, HttpError, SettingsError, ValidationError,
};
pub use heading::{build_heading, HeadingCell};
pub use schema::{CommonConfigSchema, PartnerConfigSchema, Schema};
pub use settings::Settings;
pub use table::{build_table, PartnerTable, Row};
pub use types::{CommonConfig, PartnerConfig, PartnerKey, PartnerPatch, WeekStart, ZoneName};
