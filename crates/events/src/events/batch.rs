use mailcheck_types::Summary;
use serde::{Deserialize, Serialize};

/// Progress of one bulk verification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BatchEvent {
    Started {
        total: usize,
        batch_size: usize,
    },

    /// A group settled; `group` is 1-based.
    GroupCompleted {
        group: usize,
        groups: usize,
        processed: usize,
        total: usize,
    },

    Completed {
        summary: Summary,
    },
}
