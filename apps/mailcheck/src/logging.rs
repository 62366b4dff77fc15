//! Structured logging integration for events
//!
//! Every event that passes through the CLI is also recorded as a tracing
//! record, so `--debug` log files carry the full progress history.

use mailcheck_events::{AppEvent, BatchEvent, GeneralEvent, HistoryEvent};
use tracing::{debug, error, info, warn};

/// Log an `AppEvent` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(event: &AppEvent) {
    let target = event.log_target();
    match event {
        AppEvent::Batch(batch_event) => match batch_event {
            BatchEvent::Started { total, batch_size } => {
                info!(target: "mailcheck::events", domain = target, total, batch_size, "Batch started");
            }
            BatchEvent::GroupCompleted {
                group,
                groups,
                processed,
                total,
            } => {
                debug!(
                    target: "mailcheck::events",
                    domain = target,
                    group,
                    groups,
                    processed,
                    total,
                    "Batch group completed"
                );
            }
            BatchEvent::Completed { summary } => {
                info!(
                    target: "mailcheck::events",
                    domain = target,
                    good = summary.good,
                    risky = summary.risky,
                    bad = summary.bad,
                    error = summary.error,
                    "Batch completed"
                );
            }
        },

        AppEvent::History(history_event) => match history_event {
            HistoryEvent::RunSaved { id, source_name } => {
                info!(target: "mailcheck::events", domain = target, id = %id, source_name = %source_name, "Run saved");
            }
            HistoryEvent::SaveFailed { id, failure } => {
                error!(
                    target: "mailcheck::events",
                    domain = target,
                    id = %id,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Run save failed"
                );
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::Warning { message, context } => {
                warn!(target: "mailcheck::events", domain = target, context = ?context, "{message}");
            }
            GeneralEvent::Error { message, details } => {
                error!(target: "mailcheck::events", domain = target, details = ?details, "{message}");
            }
            GeneralEvent::DebugLog { message } => {
                debug!(target: "mailcheck::events", domain = target, "{message}");
            }
            GeneralEvent::OperationStarted { operation } => {
                debug!(target: "mailcheck::events", domain = target, operation = %operation, "Operation started");
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                debug!(
                    target: "mailcheck::events",
                    domain = target,
                    operation = %operation,
                    success,
                    "Operation completed"
                );
            }
        },
    }
}
