//! Batched, partially failable save.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;

use engagement_core::{AggregateSaveError, FetchError, PartnerKey, Row};

use crate::transport::ConfigTransport;

/// Outcome of one row's update.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSaveResult {
    pub row: usize,
    pub key: PartnerKey,
    pub outcome: Result<(), FetchError>,
}

/// Per-row outcomes of a save batch, in row order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SaveReport {
    pub results: Vec<RowSaveResult>,
}

impl SaveReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_ok())
    }

    /// First failing row in row order.
    pub fn first_failure(&self) -> Option<&RowSaveResult> {
        self.results.iter().find(|r| r.outcome.is_err())
    }

    pub fn summary(&self) -> SaveSummary {
        SaveSummary {
            total: self.results.len(),
            succeeded: self.succeeded(),
            failed: self.failed(),
            first_reason: self
                .first_failure()
                .and_then(|r| r.outcome.as_ref().err())
                .map(FetchError::user_message),
        }
    }

    /// `Ok` when every update succeeded, else the aggregate failure.
    pub fn into_result(self) -> Result<(), AggregateSaveError> {
        let summary = self.summary();
        match summary.first_reason {
            None => Ok(()),
            Some(first_reason) => Err(AggregateSaveError {
                first_reason,
                failed: summary.failed,
                total: summary.total,
            }),
        }
    }
}

/// Serializable counts for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub first_reason: Option<String>,
}

/// Issues one update per row, all in flight together.
#[derive(Clone)]
pub struct SaveCoordinator {
    transport: Arc<dyn ConfigTransport>,
}

impl SaveCoordinator {
    pub fn new(transport: Arc<dyn ConfigTransport>) -> Self {
        Self { transport }
    }

    /// A failure on one row neither cancels nor blocks the others.
    pub async fn save(&self, rows: &[Row]) -> SaveReport {
        let updates = rows.iter().enumerate().map(|(index, row)| {
            let transport = Arc::clone(&self.transport);
            let patch = row.patch();
            let key = row.key.clone();
            async move {
                let outcome = transport.patch(&key, &patch).await;
                if let Err(err) = &outcome {
                    tracing::warn!(partner = %key, row = index, error = %err, "partner update failed");
                }
                RowSaveResult {
                    row: index,
                    key,
                    outcome,
                }
            }
        });
        let results = join_all(updates).await;
        let report = SaveReport { results };
        tracing::info!(
            total = report.results.len(),
            failed = report.failed(),
            "save batch settled"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use engagement_core::HttpError;

    use super::*;

    fn result(row: usize, outcome: Result<(), FetchError>) -> RowSaveResult {
        RowSaveResult {
            row,
            key: PartnerKey::from("_"),
            outcome,
        }
    }

    #[test]
    fn all_success_is_ok() {
        let report = SaveReport {
            results: vec![result(0, Ok(())), result(1, Ok(()))],
        };
        assert!(report.is_success());
        assert_eq!(report.into_result(), Ok(()));
    }

    #[test]
    fn first_failure_in_row_order_is_reported() {
        let report = SaveReport {
            results: vec![
                result(0, Ok(())),
                result(1, Err(HttpError::new(403, "Forbidden").into())),
                result(2, Err(HttpError::new(500, "Internal Server Error").into())),
            ],
        };
        assert_eq!(report.succeeded(), 1);
        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Forbidden");
        assert_eq!((err.failed, err.total), (2, 3));
    }
}
