//! Per-run verdict counts

use crate::verdict::{Verdict, VerdictStatus};
use serde::{Deserialize, Serialize};

/// Counts of each verdict category in a run.
///
/// Always derived from a verdict sequence; `good + risky + bad + error`
/// equals the number of verdicts it was computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub good: usize,
    pub risky: usize,
    pub bad: usize,
    pub error: usize,
}

impl Summary {
    #[must_use]
    pub fn from_verdicts(verdicts: &[Verdict]) -> Self {
        verdicts.iter().fold(Self::default(), |mut summary, verdict| {
            *summary.slot_mut(verdict.status) += 1;
            summary
        })
    }

    #[must_use]
    pub fn count(&self, status: VerdictStatus) -> usize {
        match status {
            VerdictStatus::Good => self.good,
            VerdictStatus::Risky => self.risky,
            VerdictStatus::Bad => self.bad,
            VerdictStatus::Error => self.error,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.good + self.risky + self.bad + self.error
    }

    /// Share of `status` in whole percent, rounded half up. 0 for an empty run.
    #[must_use]
    pub fn percentage(&self, status: VerdictStatus) -> u32 {
        let total = self.total() as u64;
        if total == 0 {
            return 0;
        }
        let count = self.count(status) as u64;
        let rounded = (count * 200 + total) / (2 * total);
        u32::try_from(rounded).unwrap_or(100)
    }

    fn slot_mut(&mut self, status: VerdictStatus) -> &mut usize {
        match status {
            VerdictStatus::Good => &mut self.good,
            VerdictStatus::Risky => &mut self.risky,
            VerdictStatus::Bad => &mut self.bad,
            VerdictStatus::Error => &mut self.error,
        }
    }
}

/// Compute the summary of a verdict sequence.
#[must_use]
pub fn aggregate(verdicts: &[Verdict]) -> Summary {
    Summary::from_verdicts(verdicts)
}
