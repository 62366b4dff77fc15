//! Completed batch runs

use crate::summary::Summary;
use crate::verdict::Verdict;
use chrono::{DateTime, NaiveDate, Utc};
use mailcheck_errors::HistoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Run identifier (UUIDv7, so ids sort by creation time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for RunId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Source name used when the caller has no file name to offer.
#[must_use]
pub fn default_source_name(date: NaiveDate) -> String {
    format!("Bulk_{}.csv", date.format("%Y-%m-%d"))
}

/// One complete batch execution.
///
/// Immutable once built. The summary is recomputed from the verdicts at
/// construction and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BatchRunRecord", try_from = "BatchRunRecord")]
pub struct BatchRun {
    id: RunId,
    source_name: String,
    created_at: DateTime<Utc>,
    verdicts: Vec<Verdict>,
    summary: Summary,
}

impl BatchRun {
    /// Build a new run stamped with a fresh id and the current time.
    #[must_use]
    pub fn new(source_name: impl Into<String>, verdicts: Vec<Verdict>) -> Self {
        Self::from_parts(RunId::new(), source_name, Utc::now(), verdicts)
    }

    #[must_use]
    pub fn from_parts(
        id: RunId,
        source_name: impl Into<String>,
        created_at: DateTime<Utc>,
        verdicts: Vec<Verdict>,
    ) -> Self {
        let summary = Summary::from_verdicts(&verdicts);
        Self {
            id,
            source_name: source_name.into(),
            created_at,
            verdicts,
            summary,
        }
    }

    #[must_use]
    pub fn id(&self) -> RunId {
        self.id
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        self.summary
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}

/// Self-contained persisted form of a [`BatchRun`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRunRecord {
    pub id: RunId,
    pub source_name: String,
    pub created_at: DateTime<Utc>,
    pub verdicts: Vec<Verdict>,
    pub summary: Summary,
}

impl From<BatchRun> for BatchRunRecord {
    fn from(run: BatchRun) -> Self {
        Self {
            id: run.id,
            source_name: run.source_name,
            created_at: run.created_at,
            verdicts: run.verdicts,
            summary: run.summary,
        }
    }
}

impl TryFrom<BatchRunRecord> for BatchRun {
    type Error = HistoryError;

    fn try_from(record: BatchRunRecord) -> Result<Self, Self::Error> {
        let stored = record.summary;
        let run = Self::from_parts(
            record.id,
            record.source_name,
            record.created_at,
            record.verdicts,
        );
        if run.summary != stored {
            return Err(HistoryError::Corrupted {
                id: run.id.to_string(),
                message: format!(
                    "stored summary {stored:?} does not match verdicts {:?}",
                    run.summary
                ),
            });
        }
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::VerdictStatus;

    #[test]
    fn summary_tracks_verdicts() {
        let run = BatchRun::new(
            "list.csv",
            vec![
                Verdict::new("a@x.com", VerdictStatus::Good, "ok"),
                Verdict::unreachable("b@x.com"),
            ],
        );
        let summary = run.summary();
        assert_eq!(summary.good, 1);
        assert_eq!(summary.error, 1);
        assert_eq!(summary.total(), run.len());
    }

    #[test]
    fn record_uses_camel_case_fields() {
        let run = BatchRun::new("list.csv", Vec::new());
        let json = serde_json::to_value(&run).unwrap();
        for field in ["id", "sourceName", "createdAt", "verdicts", "summary"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        let back: BatchRun = serde_json::from_value(json).unwrap();
        assert_eq!(back, run);
    }

    #[test]
    fn tampered_summary_is_rejected() {
        let run = BatchRun::new(
            "list.csv",
            vec![Verdict::new("a@x.com", VerdictStatus::Good, "ok")],
        );
        let mut json = serde_json::to_value(&run).unwrap();
        json["summary"]["good"] = serde_json::json!(5);
        assert!(serde_json::from_value::<BatchRun>(json).is_err());
    }

    #[test]
    fn default_source_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(default_source_name(date), "Bulk_2024-03-09.csv");
    }

    #[test]
    fn run_ids_are_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }
}
