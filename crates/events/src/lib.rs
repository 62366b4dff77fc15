#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in mailcheck
//!
//! Library crates never print. Progress and diagnostics travel over an
//! unbounded channel of [`AppEvent`]s and the CLI decides how to show them.
//! A dropped receiver is not an error: emission silently becomes a no-op.

pub mod events;
pub use events::{AppEvent, BatchEvent, FailureContext, GeneralEvent, HistoryEvent};

use mailcheck_types::{RunId, Summary};
use tokio::sync::mpsc::UnboundedSender;

/// Type alias for event sender
pub type EventSender = UnboundedSender<AppEvent>;

/// Type alias for event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<AppEvent>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events
///
/// Works the same whether you hold a raw `EventSender` or a struct that
/// contains an optional one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(event);
        }
    }

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    /// Emit an operation started event
    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    /// Emit an operation completed event
    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    fn emit_batch_started(&self, total: usize, batch_size: usize) {
        self.emit(AppEvent::Batch(BatchEvent::Started { total, batch_size }));
    }

    fn emit_group_completed(&self, group: usize, groups: usize, processed: usize, total: usize) {
        self.emit(AppEvent::Batch(BatchEvent::GroupCompleted {
            group,
            groups,
            processed,
            total,
        }));
    }

    fn emit_batch_completed(&self, summary: Summary) {
        self.emit(AppEvent::Batch(BatchEvent::Completed { summary }));
    }

    fn emit_run_saved(&self, id: RunId, source_name: impl Into<String>) {
        self.emit(AppEvent::History(HistoryEvent::RunSaved {
            id,
            source_name: source_name.into(),
        }));
    }

    fn emit_save_failed(&self, id: RunId, failure: FailureContext) {
        self.emit(AppEvent::History(HistoryEvent::SaveFailed { id, failure }));
    }
}

impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}
