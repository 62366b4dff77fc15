#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for mailcheck
//!
//! This crate sits between the CLI and the specialized crates: it wires the
//! oracle, scheduler, aggregator and history store into the operations a
//! user can run.

mod context;
mod runs;
mod types;
mod verify;

pub use context::{OpsContextBuilder, OpsCtx};
pub use runs::{export_run, export_to, get_run, history};
pub use types::{BulkReport, ExportReport, RunListing};
pub use verify::{verify_bulk, verify_single};

use mailcheck_errors::Error;
use mailcheck_types::Verdict;

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Single address verdict
    Verdict(Verdict),
    /// Bulk verification run
    Bulk(BulkReport),
    /// Stored runs
    History(Vec<RunListing>),
    /// Written export file
    Export(ExportReport),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| {
            mailcheck_errors::OpsError::SerializationError {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Whether the operation fully succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            OperationResult::Bulk(report) => report.is_saved(),
            OperationResult::Verdict(_)
            | OperationResult::History(_)
            | OperationResult::Export(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mailcheck_batch::BatchScheduler;
    use mailcheck_config::Config;
    use mailcheck_errors::{NetworkError, OpsError};
    use mailcheck_events::{AppEvent, EventReceiver, HistoryEvent};
    use mailcheck_history::{MemoryHistoryStore, RunHistoryStore};
    use mailcheck_net::{OracleAnswer, OracleStatus, VerificationOracle};
    use mailcheck_types::{ExportFilter, VerdictStatus, UNREACHABLE_REASON};
    use std::sync::Arc;

    /// Answers `Good` for `a@…`, fails for anything containing "down",
    /// `Risky` otherwise.
    struct FakeOracle;

    #[async_trait]
    impl VerificationOracle for FakeOracle {
        async fn verify(&self, email: &str) -> Result<OracleAnswer, NetworkError> {
            if email.contains("down") {
                Err(NetworkError::Unreachable("refused".into()))
            } else if email.starts_with('a') {
                Ok(OracleAnswer::new(OracleStatus::Good, "Valid"))
            } else {
                Ok(OracleAnswer::new(OracleStatus::Risky, "Catch-all, accept all"))
            }
        }
    }

    fn context(store: Arc<dyn RunHistoryStore>) -> (OpsCtx, EventReceiver) {
        let (tx, rx) = mailcheck_events::channel();
        let ctx = OpsContextBuilder::new()
            .with_oracle(Arc::new(FakeOracle))
            .with_history(store)
            .with_scheduler(BatchScheduler::new(2).unwrap())
            .with_event_sender(tx)
            .with_config(Config::default())
            .build()
            .unwrap();
        (ctx, rx)
    }

    fn history_events(rx: &mut EventReceiver) -> Vec<HistoryEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::History(event) = event {
                out.push(event);
            }
        }
        out
    }

    #[test]
    fn builder_reports_missing_component() {
        let err = OpsContextBuilder::new()
            .with_config(Config::default())
            .build()
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::Ops(OpsError::MissingComponent { ref component }) if component == "oracle"
        ));
    }

    #[test]
    fn builder_rejects_zero_batch_size() {
        let (tx, _rx) = mailcheck_events::channel();
        let mut config = Config::default();
        config.general.batch_size = 0;

        let result = OpsContextBuilder::new()
            .with_oracle(Arc::new(FakeOracle))
            .with_history(Arc::new(MemoryHistoryStore::default()))
            .with_event_sender(tx)
            .with_config(config)
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn default_config_and_scheduler_agree_on_batch_size() {
        let (tx, _rx) = mailcheck_events::channel();
        let ctx = OpsContextBuilder::new()
            .with_oracle(Arc::new(FakeOracle))
            .with_history(Arc::new(MemoryHistoryStore::default()))
            .with_event_sender(tx)
            .with_config(Config::default())
            .build()
            .unwrap();

        assert_eq!(ctx.scheduler, BatchScheduler::default());
        assert_eq!(ctx.scheduler.batch_size(), mailcheck_types::DEFAULT_BATCH_SIZE);
    }

    #[tokio::test]
    async fn single_failure_becomes_error_verdict() {
        let (ctx, _rx) = context(Arc::new(MemoryHistoryStore::default()));

        let verdict = verify_single(&ctx, "down@x.com").await.unwrap();

        assert_eq!(verdict.status, VerdictStatus::Error);
        assert_eq!(verdict.reason, UNREACHABLE_REASON);
        assert!(history(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_single_address_is_rejected() {
        let (ctx, _rx) = context(Arc::new(MemoryHistoryStore::default()));
        assert!(verify_single(&ctx, "  ").await.is_err());
    }

    #[tokio::test]
    async fn bulk_run_is_saved_and_listed() {
        let (ctx, mut rx) = context(Arc::new(MemoryHistoryStore::default()));
        let addresses = vec!["a@x.com".to_string(), "b@x.com".to_string()];

        let report = verify_bulk(&ctx, Some("leads.csv".into()), &addresses).await;

        assert!(report.is_saved());
        assert_eq!(report.run.summary().good, 1);
        assert_eq!(report.run.summary().risky, 1);

        let listing = history(&ctx).await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].source_name, "leads.csv");
        assert_eq!(listing[0].total, 2);

        assert!(matches!(
            history_events(&mut rx).as_slice(),
            [HistoryEvent::RunSaved { .. }]
        ));
    }

    #[tokio::test]
    async fn bulk_without_name_uses_dated_default() {
        let (ctx, _rx) = context(Arc::new(MemoryHistoryStore::default()));

        let report = verify_bulk(&ctx, None, &["a@x.com".to_string()]).await;

        let name = report.run.source_name();
        assert!(name.starts_with("Bulk_") && name.ends_with(".csv"), "{name}");
    }

    #[tokio::test]
    async fn failed_save_keeps_run_usable() {
        let (ctx, mut rx) = context(Arc::new(MemoryHistoryStore::new(0)));
        let addresses = vec!["a@x.com".to_string(), "down@x.com".to_string()];

        let report = verify_bulk(&ctx, Some("big.csv".into()), &addresses).await;

        assert!(!report.is_saved());
        assert_eq!(
            report.save_error.as_ref().and_then(|f| f.code.as_deref()),
            Some("history.storage_full")
        );
        assert_eq!(report.run.len(), 2);
        assert_eq!(report.run.summary().error, 1);
        assert!(matches!(
            history_events(&mut rx).as_slice(),
            [HistoryEvent::SaveFailed { .. }]
        ));

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("big.csv");
        let export = export_to(&ctx, &report.run, ExportFilter::All, Some(out.clone()))
            .await
            .unwrap();
        assert_eq!(export.rows, 2);
        assert!(out.exists());
    }

    #[tokio::test]
    async fn stored_run_can_be_reexported_with_filter() {
        let (ctx, _rx) = context(Arc::new(MemoryHistoryStore::default()));
        let addresses = vec![
            "a@x.com".to_string(),
            "b@x.com".to_string(),
            "another@x.com".to_string(),
        ];
        let report = verify_bulk(&ctx, Some("list.csv".into()), &addresses).await;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("good.csv");
        let export = export_run(
            &ctx,
            &report.run.id().to_string(),
            ExportFilter::Only(VerdictStatus::Good),
            Some(out.clone()),
        )
        .await
        .unwrap();

        assert_eq!(export.rows, 2);
        let text = std::fs::read_to_string(out).unwrap();
        assert_eq!(
            text,
            "Email,Status,Reason\na@x.com,Good,Valid\nanother@x.com,Good,Valid"
        );
    }

    #[tokio::test]
    async fn unknown_or_malformed_run_ids_are_reported() {
        let (ctx, _rx) = context(Arc::new(MemoryHistoryStore::default()));

        let missing = get_run(&ctx, &mailcheck_types::RunId::new().to_string())
            .await
            .unwrap_err();
        assert!(matches!(missing, Error::Ops(OpsError::RunNotFound { .. })));

        let malformed = get_run(&ctx, "not-a-uuid").await.unwrap_err();
        assert!(matches!(malformed, Error::Ops(OpsError::InvalidRunId { .. })));
    }

    #[test]
    fn operation_result_serializes_with_type_tag() {
        let result = OperationResult::Verdict(Verdict::new("a@x.com", VerdictStatus::Good, "ok"));
        let json = result.to_json().unwrap();
        assert!(json.contains("\"type\": \"Verdict\""));
        assert!(result.is_success());
    }
}
