use serde::{Deserialize, Serialize};

/// General utility events for warnings, errors, and operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneralEvent {
    Warning {
        message: String,
        context: Option<String>,
    },

    Error {
        message: String,
        details: Option<String>,
    },

    DebugLog {
        message: String,
    },

    OperationStarted {
        operation: String,
    },

    OperationCompleted {
        operation: String,
        success: bool,
    },
}

impl GeneralEvent {
    /// Create a warning event
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
            context: None,
        }
    }

    /// Create a debug log event
    pub fn debug(message: impl Into<String>) -> Self {
        Self::DebugLog {
            message: message.into(),
        }
    }
}
