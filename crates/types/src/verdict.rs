//! Verdicts and verdict categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reason attached to every verdict synthesized for an oracle failure.
pub const UNREACHABLE_REASON: &str = "Server not reachable";

/// The closed set of verdict categories.
///
/// `Error` is never produced by the oracle; it is synthesized when the oracle
/// could not be reached or did not answer with something usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VerdictStatus {
    Good,
    Risky,
    Bad,
    Error,
}

impl VerdictStatus {
    /// All categories in display order.
    pub const ALL: [Self; 4] = [Self::Good, Self::Risky, Self::Bad, Self::Error];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Risky => "Risky",
            Self::Bad => "Bad",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown verdict status: {0}")]
pub struct ParseVerdictStatusError(pub String);

impl FromStr for VerdictStatus {
    type Err = ParseVerdictStatusError;

    /// Case-insensitive, for user input. The oracle contract is matched
    /// strictly by the network client instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "good" => Ok(Self::Good),
            "risky" => Ok(Self::Risky),
            "bad" => Ok(Self::Bad),
            "error" => Ok(Self::Error),
            _ => Err(ParseVerdictStatusError(s.to_string())),
        }
    }
}

/// The outcome of verifying one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// The original address string, unmodified
    pub email: String,
    pub status: VerdictStatus,
    /// Free-text explanation, opaque to mailcheck
    pub reason: String,
}

impl Verdict {
    #[must_use]
    pub fn new(email: impl Into<String>, status: VerdictStatus, reason: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Verdict for an address whose oracle call failed.
    #[must_use]
    pub fn unreachable(email: impl Into<String>) -> Self {
        Self::new(email, VerdictStatus::Error, UNREACHABLE_REASON)
    }
}
