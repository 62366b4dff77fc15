//! Event handling and progress display

use crate::logging::log_event_with_tracing;
use console::{Style, Term};
use mailcheck_events::{AppEvent, BatchEvent, GeneralEvent, HistoryEvent};

/// Event handler for progress display and user feedback
///
/// Progress goes to stderr so stdout only carries the final result.
pub struct EventHandler {
    /// Whether to use colors
    colors_enabled: bool,
    /// Show debug events
    debug_enabled: bool,
    /// Suppress all terminal output (JSON mode)
    quiet: bool,
    term: Term,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(colors_enabled: bool, debug_enabled: bool, quiet: bool) -> Self {
        Self {
            colors_enabled,
            debug_enabled,
            quiet,
            term: Term::stderr(),
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        log_event_with_tracing(&event);
        if let Some(line) = self.render(&event) {
            self.show(&line);
        }
    }

    /// Terminal line for an event, if it has one
    fn render(&self, event: &AppEvent) -> Option<String> {
        match event {
            AppEvent::Batch(BatchEvent::Started { total, batch_size }) => Some(format!(
                "Verifying {total} address(es), {batch_size} at a time"
            )),
            AppEvent::Batch(BatchEvent::GroupCompleted {
                group,
                groups,
                processed,
                total,
            }) => Some(self.dim(&format!("  [{group}/{groups}] {processed}/{total} verified"))),
            AppEvent::Batch(BatchEvent::Completed { .. })
            | AppEvent::History(HistoryEvent::RunSaved { .. }) => None,
            AppEvent::History(HistoryEvent::SaveFailed { failure, .. }) => Some(self.warn(
                &format!("Warning: results were not saved to history: {}", failure.message),
            )),
            AppEvent::General(GeneralEvent::Warning { message, .. }) => {
                Some(self.warn(&format!("Warning: {message}")))
            }
            AppEvent::General(GeneralEvent::Error { message, details }) => {
                let mut line = self.error(&format!("Error: {message}"));
                if let Some(details) = details {
                    line.push_str(&format!("\n  {details}"));
                }
                Some(line)
            }
            AppEvent::General(GeneralEvent::DebugLog { message }) if self.debug_enabled => {
                Some(self.dim(&format!("[debug] {message}")))
            }
            AppEvent::General(GeneralEvent::OperationStarted { operation })
                if self.debug_enabled =>
            {
                Some(self.dim(&format!("[debug] {operation} started")))
            }
            AppEvent::General(GeneralEvent::OperationCompleted { operation, success })
                if self.debug_enabled =>
            {
                Some(self.dim(&format!(
                    "[debug] {operation} {}",
                    if *success { "completed" } else { "finished with errors" }
                )))
            }
            AppEvent::General(_) => None,
        }
    }

    fn show(&self, line: &str) {
        if !self.quiet {
            let _ = self.term.write_line(line);
        }
    }

    fn dim(&self, text: &str) -> String {
        self.styled(Style::new().dim(), text)
    }

    fn warn(&self, text: &str) -> String {
        self.styled(Style::new().yellow(), text)
    }

    fn error(&self, text: &str) -> String {
        self.styled(Style::new().red().bold(), text)
    }

    fn styled(&self, style: Style, text: &str) -> String {
        if self.colors_enabled {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcheck_events::FailureContext;
    use mailcheck_types::RunId;

    fn plain() -> EventHandler {
        EventHandler::new(false, false, true)
    }

    #[test]
    fn group_progress_is_rendered() {
        let line = plain().render(&AppEvent::Batch(BatchEvent::GroupCompleted {
            group: 2,
            groups: 3,
            processed: 4,
            total: 5,
        }));
        assert_eq!(line.as_deref(), Some("  [2/3] 4/5 verified"));
    }

    #[test]
    fn save_failure_is_surfaced() {
        let line = plain()
            .render(&AppEvent::History(HistoryEvent::SaveFailed {
                id: RunId::new(),
                failure: FailureContext {
                    code: Some("history.storage_full".into()),
                    message: "history storage full".into(),
                    hint: None,
                    retryable: false,
                },
            }))
            .unwrap();
        assert!(line.contains("not saved"));
    }

    #[test]
    fn debug_lines_need_debug_mode() {
        let event = AppEvent::General(GeneralEvent::debug("hello"));
        assert!(plain().render(&event).is_none());
        assert!(EventHandler::new(false, true, true).render(&event).is_some());
    }
}
