//! CLI error handling

use std::fmt;

use mailcheck_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Operations error
    Ops(mailcheck_errors::Error),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Ops(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Ops(e) => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<mailcheck_errors::Error> for CliError {
    fn from(e: mailcheck_errors::Error) -> Self {
        CliError::Ops(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcheck_errors::{ConfigError, Error, HistoryError};

    #[test]
    fn config_errors_render_with_code() {
        let err: CliError = Error::from(ConfigError::InvalidValue {
            field: "batch_size".into(),
            value: "0".into(),
        })
        .into();

        let text = err.to_string();
        assert!(text.contains("batch_size"));
        assert!(text.contains("Code: config."));
    }

    #[test]
    fn storage_full_renders_hint_without_retry() {
        let err: CliError = Error::from(HistoryError::StorageFull {
            required: 10,
            limit: 5,
        })
        .into();

        let text = err.to_string();
        assert!(text.contains("Hint:"));
        assert!(!text.contains("Retry:"));
    }
}
