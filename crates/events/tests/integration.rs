//! Integration tests for events

#[cfg(test)]
mod tests {
    use mailcheck_errors::HistoryError;
    use mailcheck_events::*;
    use mailcheck_types::{RunId, Summary};

    #[tokio::test]
    async fn test_emitter_helpers() {
        let (tx, mut rx) = channel();

        tx.emit_warning("test warning");
        tx.emit_debug("test debug");
        tx.emit_batch_completed(Summary::default());

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(event1, AppEvent::General(GeneralEvent::Warning { .. })));

        let event2 = rx.recv().await.unwrap();
        assert!(matches!(event2, AppEvent::General(GeneralEvent::DebugLog { .. })));

        let event3 = rx.recv().await.unwrap();
        assert!(matches!(event3, AppEvent::Batch(BatchEvent::Completed { .. })));
    }

    #[test]
    fn test_save_failure_carries_error_details() {
        let failure = FailureContext::from_error(&HistoryError::StorageFull {
            required: 10,
            limit: 5,
        });
        assert_eq!(failure.code.as_deref(), Some("history.storage_full"));
        assert!(failure.hint.is_some());
        assert!(!failure.retryable);

        let event = AppEvent::History(HistoryEvent::SaveFailed {
            id: RunId::new(),
            failure,
        });
        assert_eq!(event.log_level(), tracing::Level::ERROR);
        assert_eq!(event.log_target(), "mailcheck::events::history");
    }

    #[test]
    fn test_events_serialize_with_domain_tag() {
        let event = AppEvent::Batch(BatchEvent::Started {
            total: 3,
            batch_size: 2,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "batch");
        assert_eq!(json["event"]["type"], "Started");
    }
}
