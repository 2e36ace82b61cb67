use thiserror::Error;

use engagement_core::{AggregateSaveError, EditError, FetchError, ZoneName};

/// Error surface of the aggregation engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Loading the common or a partner record failed; displays the user text.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("unknown zone '{0}'")]
    UnknownZone(ZoneName),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("no table loaded")]
    NotLoaded,

    #[error("save is disabled")]
    SaveDisabled,

    #[error(transparent)]
    Save(#[from] AggregateSaveError),
}
