//! Oracle transport error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    #[error("connection timeout to {url}")]
    Timeout { url: String },

    #[error("oracle unreachable: {0}")]
    Unreachable(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("malformed oracle response: {0}")]
    MalformedResponse(String),

    #[error("failed to build HTTP client: {0}")]
    ClientSetup(String),
}

impl UserFacingError for NetworkError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Timeout { .. } | Self::Unreachable(_) => {
                Some("Check that the verification service is running and reachable.")
            }
            Self::InvalidUrl(_) => Some("Fix `oracle.base_url` in the configuration file."),
            Self::MalformedResponse(_) => {
                Some("The verification service returned an unexpected payload.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Unreachable(_) => true,
            Self::HttpError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Timeout { .. } => "network.timeout",
            Self::Unreachable(_) => "network.unreachable",
            Self::InvalidUrl(_) => "network.invalid_url",
            Self::HttpError { .. } => "network.http_error",
            Self::MalformedResponse(_) => "network.malformed_response",
            Self::ClientSetup(_) => "network.client_setup",
        };
        Some(code)
    }
}
