//! Operation orchestration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum OpsError {
    #[error("component not found: {component}")]
    MissingComponent { component: String },

    #[error("run not found: {id}")]
    RunNotFound { id: String },

    #[error("invalid run id: {id}")]
    InvalidRunId { id: String },

    #[error("no addresses to verify")]
    NoAddresses,

    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

impl UserFacingError for OpsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::RunNotFound { .. } | Self::InvalidRunId { .. } => {
                Some("Use `mailcheck history` to list stored run ids.")
            }
            Self::NoAddresses => {
                Some("Pass addresses as arguments, pipe them on stdin, or use --file.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::MissingComponent { .. } => "ops.missing_component",
            Self::RunNotFound { .. } => "ops.run_not_found",
            Self::InvalidRunId { .. } => "ops.invalid_run_id",
            Self::NoAddresses => "ops.no_addresses",
            Self::SerializationError { .. } => "ops.serialization",
        };
        Some(code)
    }
}
