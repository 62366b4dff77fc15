//! Operations context for dependency injection

use mailcheck_batch::BatchScheduler;
use mailcheck_config::Config;
use mailcheck_errors::{Error, OpsError};
use mailcheck_events::{EventEmitter, EventSender};
use mailcheck_history::RunHistoryStore;
use mailcheck_net::VerificationOracle;
use std::sync::Arc;

/// Operations context providing access to all system components
pub struct OpsCtx {
    /// Verification oracle
    pub oracle: Arc<dyn VerificationOracle>,
    /// Run history
    pub history: Arc<dyn RunHistoryStore>,
    /// Bounded-concurrency scheduler
    pub scheduler: BatchScheduler,
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// System configuration
    pub config: Config,
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

/// Builder for the operations context
#[derive(Default)]
pub struct OpsContextBuilder {
    oracle: Option<Arc<dyn VerificationOracle>>,
    history: Option<Arc<dyn RunHistoryStore>>,
    scheduler: Option<BatchScheduler>,
    tx: Option<EventSender>,
    config: Option<Config>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the verification oracle
    #[must_use]
    pub fn with_oracle(mut self, oracle: Arc<dyn VerificationOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Set the run history store
    #[must_use]
    pub fn with_history(mut self, history: Arc<dyn RunHistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    /// Override the scheduler; otherwise it is built from `general.batch_size`
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: BatchScheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing or the
    /// configured batch size is invalid.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let oracle = self.oracle.ok_or_else(|| missing("oracle"))?;
        let history = self.history.ok_or_else(|| missing("history"))?;
        let tx = self.tx.ok_or_else(|| missing("event_sender"))?;
        let config = self.config.ok_or_else(|| missing("config"))?;

        let scheduler = match self.scheduler {
            Some(scheduler) => scheduler,
            None => BatchScheduler::new(config.general.batch_size)?,
        };

        Ok(OpsCtx {
            oracle,
            history,
            scheduler,
            tx,
            config,
        })
    }
}

fn missing(component: &str) -> Error {
    OpsError::MissingComponent {
        component: component.to_string(),
    }
    .into()
}
