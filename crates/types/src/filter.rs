//! Export filters over verdict categories

use crate::verdict::{ParseVerdictStatusError, Verdict, VerdictStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which verdicts an export includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportFilter {
    #[default]
    All,
    Only(VerdictStatus),
}

impl ExportFilter {
    #[must_use]
    pub fn matches(&self, verdict: &Verdict) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => verdict.status == *status,
        }
    }
}

impl fmt::Display for ExportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(status) => status.fmt(f),
        }
    }
}

impl FromStr for ExportFilter {
    type Err = ParseVerdictStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_and_each_category() {
        assert_eq!("All".parse::<ExportFilter>().unwrap(), ExportFilter::All);
        assert_eq!(
            "risky".parse::<ExportFilter>().unwrap(),
            ExportFilter::Only(VerdictStatus::Risky)
        );
        assert!("some".parse::<ExportFilter>().is_err());
    }

    #[test]
    fn only_matches_its_category() {
        let good = Verdict::new("a@x.com", VerdictStatus::Good, "ok");
        let bad = Verdict::new("b@x.com", VerdictStatus::Bad, "no mx");
        let filter = ExportFilter::Only(VerdictStatus::Good);

        assert!(filter.matches(&good));
        assert!(!filter.matches(&bad));
        assert!(ExportFilter::All.matches(&bad));
    }
}
