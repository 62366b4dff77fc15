use mailcheck_types::RunId;
use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Run history persistence events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HistoryEvent {
    RunSaved {
        id: RunId,
        source_name: String,
    },

    /// The run stays usable in memory; only the persisted copy is missing.
    SaveFailed {
        id: RunId,
        failure: FailureContext,
    },
}
