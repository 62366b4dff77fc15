#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for mailcheck
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/mailcheck/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

use mailcheck_errors::{ConfigError, Error};
use mailcheck_types::{ColorChoice, OutputFormat, DEFAULT_BATCH_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use url::Url;

/// Default capacity of the run history store (5 MiB)
pub const DEFAULT_HISTORY_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Default upper bound for an address input file (5 MiB)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub oracle: OracleConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub input: InputConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// Verification oracle endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_verify_path")]
    pub verify_path: String,
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
}

/// Run history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub db_path: Option<PathBuf>,
    #[serde(default = "default_history_max_bytes")]
    pub max_bytes: u64,
}

/// Address input limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

// Default implementations

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: OutputFormat::Tty,
            color: ColorChoice::Auto,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            verify_path: default_verify_path(),
            timeout: 30,
            connect_timeout: 10,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            max_bytes: DEFAULT_HISTORY_MAX_BYTES,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

// Default value functions for serde
fn default_output_format() -> OutputFormat {
    OutputFormat::Tty
}

fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_verify_path() -> String {
    "/api/email/verify".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_history_max_bytes() -> u64 {
    DEFAULT_HISTORY_MAX_BYTES
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

impl OracleConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    /// Full URL of the single-address verification endpoint
    #[must_use]
    pub fn verify_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.verify_path.trim_start_matches('/')
        )
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("mailcheck").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Merge values from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds a value that cannot be parsed.
    pub fn merge_vars<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        // MAILCHECK_OUTPUT
        if let Some(output) = lookup("MAILCHECK_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "MAILCHECK_OUTPUT".to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        // MAILCHECK_COLOR
        if let Some(color) = lookup("MAILCHECK_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "MAILCHECK_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // MAILCHECK_BATCH_SIZE
        if let Some(size) = lookup("MAILCHECK_BATCH_SIZE") {
            self.general.batch_size = size.parse().map_err(|_| ConfigError::InvalidValue {
                field: "MAILCHECK_BATCH_SIZE".to_string(),
                value: size,
            })?;
        }

        // MAILCHECK_ORACLE_URL
        if let Some(url) = lookup("MAILCHECK_ORACLE_URL") {
            self.oracle.base_url = url;
        }

        // MAILCHECK_HISTORY_DB
        if let Some(path) = lookup("MAILCHECK_HISTORY_DB") {
            self.history.db_path = Some(PathBuf::from(path));
        }

        Ok(())
    }

    /// Check values that deserialize fine but make no sense
    ///
    /// # Errors
    ///
    /// Returns an error for a zero batch size, a zero byte limit, or an
    /// oracle URL that is not an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), Error> {
        let zero = |field: &str| -> Error {
            ConfigError::InvalidValue {
                field: field.to_string(),
                value: "0".to_string(),
            }
            .into()
        };
        if self.general.batch_size == 0 {
            return Err(zero("general.batch_size"));
        }
        if self.history.max_bytes == 0 {
            return Err(zero("history.max_bytes"));
        }
        if self.input.max_file_bytes == 0 {
            return Err(zero("input.max_file_bytes"));
        }

        let url = self.oracle.verify_url();
        match Url::parse(&url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
            _ => Err(ConfigError::InvalidValue {
                field: "oracle.base_url".to_string(),
                value: self.oracle.base_url.clone(),
            }
            .into()),
        }
    }

    /// Get the history database path (with default)
    #[must_use]
    pub fn history_db_path(&self) -> PathBuf {
        self.history
            .db_path
            .clone()
            .unwrap_or_else(|| data_dir().join("history.sqlite"))
    }

    /// Get the directory for debug log files
    #[must_use]
    pub fn logs_path(&self) -> PathBuf {
        data_dir().join("logs")
    }
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailcheck")
}
