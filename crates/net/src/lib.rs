#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Verification oracle access for mailcheck
//!
//! This crate defines the contract mailcheck expects from the external
//! verification service and an HTTP client implementing it. The oracle
//! classifies one address per call; fan-out is the batch scheduler's job.

mod client;
mod oracle;

pub use client::{NetClient, NetConfig};
pub use oracle::{HttpOracle, OracleAnswer, OracleStatus, VerificationOracle};

use mailcheck_errors::{Error, NetworkError};
use url::Url;

/// Parse and validate an oracle URL
///
/// # Errors
///
/// Returns an error if the URL string is malformed or does not use http(s).
pub fn parse_url(url: &str) -> Result<Url, Error> {
    let parsed = Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(NetworkError::InvalidUrl(format!("unsupported scheme: {other}")).into()),
    }
}
