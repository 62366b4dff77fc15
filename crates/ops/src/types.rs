//! Types for operations and results

use chrono::{DateTime, Utc};
use mailcheck_events::FailureContext;
use mailcheck_types::{BatchRun, ExportFilter, RunId, Summary};
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of a bulk verification
///
/// The run is always complete and exportable. `save_error` is set when the
/// persisted copy could not be written.
#[derive(Clone, Debug, Serialize)]
pub struct BulkReport {
    pub run: BatchRun,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_error: Option<FailureContext>,
}

impl BulkReport {
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.save_error.is_none()
    }
}

/// One line of the history listing
#[derive(Clone, Debug, Serialize)]
pub struct RunListing {
    pub id: RunId,
    pub source_name: String,
    pub created_at: DateTime<Utc>,
    pub total: usize,
    pub summary: Summary,
}

impl From<&BatchRun> for RunListing {
    fn from(run: &BatchRun) -> Self {
        Self {
            id: run.id(),
            source_name: run.source_name().to_string(),
            created_at: run.created_at(),
            total: run.len(),
            summary: run.summary(),
        }
    }
}

/// Where an export went and what it contained
#[derive(Clone, Debug, Serialize)]
pub struct ExportReport {
    pub run_id: RunId,
    pub path: PathBuf,
    pub filter: ExportFilter,
    pub rows: usize,
}
