#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for mailcheck
//!
//! This crate provides fine-grained error types organized by domain.
//! Per-address oracle failures never leave the batch scheduler; everything
//! here is what a caller can actually observe.

use std::borrow::Cow;

use thiserror::Error;

pub mod config;
pub mod history;
pub mod input;
pub mod network;
pub mod ops;

// Re-export all error types at the root
pub use config::ConfigError;
pub use history::HistoryError;
pub use input::InputError;
pub use network::NetworkError;
pub use ops::OpsError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("history error: {0}")]
    History(#[from] HistoryError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("ops error: {0}")]
    Ops(#[from] OpsError),

    #[error("I/O error: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
        path: Option<std::path::PathBuf>,
    },
}

impl Error {
    /// Create an Io error with an associated path
    pub fn io_with_path(err: &std::io::Error, path: impl Into<std::path::PathBuf>) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: Some(path.into()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::History(HistoryError::Database {
            message: err.to_string(),
        })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::History(HistoryError::Serialization {
            message: err.to_string(),
        })
    }
}

/// Result type alias for mailcheck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for analytics / structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Network(err) => err.user_message(),
            Error::History(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
            Error::Input(err) => err.user_message(),
            Error::Ops(err) => err.user_message(),
            Error::Io { message, .. } => Cow::Owned(message.clone()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Network(err) => err.user_hint(),
            Error::History(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
            Error::Input(err) => err.user_hint(),
            Error::Ops(err) => err.user_hint(),
            Error::Io { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Network(err) => err.is_retryable(),
            Error::History(err) => err.is_retryable(),
            Error::Io { .. } => true,
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Network(err) => err.user_code(),
            Error::History(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
            Error::Input(err) => err.user_code(),
            Error::Ops(err) => err.user_code(),
            Error::Io { .. } => Some("error.io"),
        }
    }
}
