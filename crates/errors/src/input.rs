//! Address input error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum InputError {
    #[error("input file {path} is {size} bytes, limit is {limit} bytes")]
    FileTooLarge { path: String, size: u64, limit: u64 },

    #[error("unsupported input format: {path}")]
    UnsupportedFormat { path: String },

    #[error("failed to read input {path}: {message}")]
    Unreadable { path: String, message: String },
}

impl UserFacingError for InputError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::FileTooLarge { .. } => {
                Some("Split the list into smaller files or raise `input.max_file_bytes`.")
            }
            Self::UnsupportedFormat { .. } => {
                Some("Export the spreadsheet as CSV, or pass one address per line.")
            }
            Self::Unreadable { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::FileTooLarge { .. } => "input.file_too_large",
            Self::UnsupportedFormat { .. } => "input.unsupported_format",
            Self::Unreadable { .. } => "input.unreadable",
        };
        Some(code)
    }
}
