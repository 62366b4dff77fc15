//! Run history persistence error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum HistoryError {
    #[error("history storage full: {required} bytes required, limit is {limit} bytes")]
    StorageFull { required: u64, limit: u64 },

    #[error("database error: {message}")]
    Database { message: String },

    #[error("run record serialization failed: {message}")]
    Serialization { message: String },

    #[error("stored run {id} is corrupted: {message}")]
    Corrupted { id: String, message: String },

    #[error("migration failed: {message}")]
    MigrationFailed { message: String },
}

impl UserFacingError for HistoryError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::StorageFull { .. } => Some(
                "The run was not saved. Export the results now, or raise `history.max_bytes`.",
            ),
            Self::Database { .. } => Some("Check that the history database path is writable."),
            Self::Corrupted { .. } => {
                Some("The history database was modified outside mailcheck.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Database { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::StorageFull { .. } => "history.storage_full",
            Self::Database { .. } => "history.database",
            Self::Serialization { .. } => "history.serialization",
            Self::Corrupted { .. } => "history.corrupted",
            Self::MigrationFailed { .. } => "history.migration_failed",
        };
        Some(code)
    }
}
