//! In-process run history

use crate::{check_capacity, encode_run, RunHistoryStore};
use async_trait::async_trait;
use mailcheck_errors::{Error, HistoryError};
use mailcheck_types::{BatchRun, RunId};
use tokio::sync::RwLock;

/// Run history held in memory, with the same byte budget semantics as the
/// `SQLite` store.
#[derive(Debug)]
pub struct MemoryHistoryStore {
    runs: RwLock<Vec<(BatchRun, u64)>>,
    max_bytes: u64,
}

impl MemoryHistoryStore {
    #[must_use]
    pub fn new(max_bytes: u64) -> Self {
        Self {
            runs: RwLock::new(Vec::new()),
            max_bytes,
        }
    }

    pub async fn used_bytes(&self) -> u64 {
        self.runs.read().await.iter().map(|(_, bytes)| bytes).sum()
    }
}

impl Default for MemoryHistoryStore {
    fn default() -> Self {
        Self::new(u64::MAX)
    }
}

#[async_trait]
impl RunHistoryStore for MemoryHistoryStore {
    async fn save(&self, run: &BatchRun) -> Result<(), Error> {
        let incoming = encode_run(run)?.len() as u64;

        let mut runs = self.runs.write().await;
        if runs.iter().any(|(stored, _)| stored.id() == run.id()) {
            return Err(HistoryError::Database {
                message: format!("run {} already stored", run.id()),
            }
            .into());
        }
        let used: u64 = runs.iter().map(|(_, bytes)| bytes).sum();
        check_capacity(used, incoming, self.max_bytes)?;
        runs.push((run.clone(), incoming));
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<BatchRun>, Error> {
        Ok(self
            .runs
            .read()
            .await
            .iter()
            .rev()
            .map(|(run, _)| run.clone())
            .collect())
    }

    async fn get(&self, id: RunId) -> Result<Option<BatchRun>, Error> {
        Ok(self
            .runs
            .read()
            .await
            .iter()
            .find(|(run, _)| run.id() == id)
            .map(|(run, _)| run.clone()))
    }
}
