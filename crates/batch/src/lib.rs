#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Bounded-concurrency batch verification
//!
//! The scheduler splits an address list into consecutive groups of at most
//! `batch_size` addresses. All calls of a group are in flight together and
//! the next group starts only once every member of the current one has
//! settled. Oracle failures never escape: each one becomes an `Error`
//! verdict for its own address, so the output always has exactly one
//! verdict per input address, in input order.

use futures::future::join_all;
use mailcheck_errors::{ConfigError, Error};
use mailcheck_events::EventEmitter;
use mailcheck_net::VerificationOracle;
use mailcheck_types::{Address, Summary, Verdict, DEFAULT_BATCH_SIZE};

/// Drives one oracle call per address with a fixed concurrency ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchScheduler {
    batch_size: usize,
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl BatchScheduler {
    /// Create a scheduler with the given group size
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `batch_size` is zero.
    pub fn new(batch_size: usize) -> Result<Self, Error> {
        if batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch_size".to_string(),
                value: batch_size.to_string(),
            }
            .into());
        }
        Ok(Self { batch_size })
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of groups `total` addresses are split into
    #[must_use]
    pub fn group_count(&self, total: usize) -> usize {
        total.div_ceil(self.batch_size)
    }

    /// Verify every address and return the verdicts in input order
    ///
    /// Never fails. Emits `Started`, one `GroupCompleted` per group and
    /// `Completed` through `events`.
    pub async fn run<O, E>(&self, oracle: &O, addresses: &[Address], events: &E) -> Vec<Verdict>
    where
        O: VerificationOracle + ?Sized,
        E: EventEmitter + ?Sized,
    {
        let total = addresses.len();
        let groups = self.group_count(total);
        tracing::info!(total, batch_size = self.batch_size, groups, "starting batch");
        events.emit_batch_started(total, self.batch_size);

        let mut verdicts = Vec::with_capacity(total);
        for (index, group) in addresses.chunks(self.batch_size).enumerate() {
            let settled = join_all(group.iter().map(|email| verify_one(oracle, email))).await;
            verdicts.extend(settled);
            events.emit_group_completed(index + 1, groups, verdicts.len(), total);
        }

        let summary = Summary::from_verdicts(&verdicts);
        tracing::info!(
            good = summary.good,
            risky = summary.risky,
            bad = summary.bad,
            error = summary.error,
            "batch finished"
        );
        events.emit_batch_completed(summary);
        verdicts
    }
}

async fn verify_one<O>(oracle: &O, email: &str) -> Verdict
where
    O: VerificationOracle + ?Sized,
{
    match oracle.verify(email).await {
        Ok(answer) => answer.into_verdict(email),
        Err(e) => {
            tracing::debug!(email, error = %e, "oracle call failed");
            Verdict::unreachable(email)
        }
    }
}
