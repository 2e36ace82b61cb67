//! Engagement engine: transport seam, fetch/save fan-out and the aggregation
//! engine owning a zone's derived state.

mod error;
pub mod engine;
pub mod fetcher;
pub mod save;
pub mod transport;

pub use engine::{
    fetch_zone, Applied, ConfigAggregationEngine, EngagementView, EngineEvent, LoadOutcome,
    LoadTicket, LoadedZone, RowView, SaveTicket, TITLE_EXTENSION,
};
pub use error::EngineError;
pub use fetcher::ConfigFetcher;
pub use save::{RowSaveResult, SaveCoordinator, SaveReport, SaveSummary};
pub use transport::{ConfigTransport, HttpTransport, COMMON_RESOURCE};
