//! Error types for engagement-core.

use std::path::PathBuf;

use thiserror::Error;

/// A non-2xx response from the configuration API.
///
/// Displays as the bare reason phrase (`"Forbidden"`), which is what the
/// user is shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason_phrase}")]
pub struct HttpError {
    pub status_code: u16,
    pub reason_phrase: String,
}

impl HttpError {
    pub fn new(status_code: u16, reason_phrase: impl Into<String>) -> Self {
        Self {
            status_code,
            reason_phrase: reason_phrase.into(),
        }
    }
}

/// A schema rejection. The message is display text, shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for ValidationError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ValidationError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Failure of one fetch + validate step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No HTTP status available: connection failure, undecodable body, etc.
    #[error("{message}")]
    Transport { message: String },
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Summary of a save batch where at least one update failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{first_reason}")]
pub struct AggregateSaveError {
    /// Reason of the first failing row, in row order.
    pub first_reason: String,
    pub failed: usize,
    pub total: usize,
}

/// An edit addressed outside the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("row {row} out of range (table has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("shift slot {slot} out of range for row {row} ({slots} slots)")]
    SlotOutOfRange { row: usize, slot: usize, slots: usize },
}

/// All errors that can arise from reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (write path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with the file path.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SettingsError {
    SettingsError::Io {
        path: path.into(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display_their_user_text_verbatim() {
        assert_eq!(HttpError::new(403, "Forbidden").to_string(), "Forbidden");
        let fetch: FetchError = ValidationError::from("stubbed common configuration validation").into();
        assert_eq!(fetch.user_message(), "stubbed common configuration validation");
        assert_eq!(
            FetchError::transport("connection refused").user_message(),
            "connection refused"
        );
    }
}
