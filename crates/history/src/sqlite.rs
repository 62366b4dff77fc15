//! `SQLite`-backed run history

use crate::{decode_run, encode_run, queries, RunHistoryStore};
use async_trait::async_trait;
use mailcheck_config::Config;
use mailcheck_errors::{Error, HistoryError};
use mailcheck_types::{BatchRun, RunId};
use sqlx::{Pool, Sqlite};
use std::path::{Path, PathBuf};

/// Run history stored in a local `SQLite` database
#[derive(Clone)]
pub struct SqliteHistoryStore {
    pool: Pool<Sqlite>,
    db_path: PathBuf,
    max_bytes: u64,
}

impl SqliteHistoryStore {
    /// Open (creating if needed) the database at `db_path` and migrate it
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, the
    /// database cannot be opened, or migrations fail.
    pub async fn open(db_path: &Path, max_bytes: u64) -> Result<Self, Error> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Error::io_with_path(&e, parent))?;
            }
        }

        let pool = crate::create_pool(db_path).await?;
        crate::run_migrations(&pool).await?;
        tracing::debug!(path = %db_path.display(), max_bytes, "history store opened");

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
            max_bytes,
        })
    }

    /// Open the store described by the `[history]` config section
    ///
    /// # Errors
    ///
    /// See [`SqliteHistoryStore::open`].
    pub async fn from_config(config: &Config) -> Result<Self, Error> {
        Self::open(&config.history_db_path(), config.history.max_bytes).await
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Serialized bytes currently held
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn used_bytes(&self) -> Result<u64, Error> {
        let mut tx = self.pool.begin().await?;
        let used = queries::used_bytes(&mut tx).await?;
        tx.commit().await?;
        Ok(used)
    }
}

#[async_trait]
impl RunHistoryStore for SqliteHistoryStore {
    async fn save(&self, run: &BatchRun) -> Result<(), Error> {
        let payload = encode_run(run)?;
        let incoming = payload.len() as u64;

        let mut tx = self.pool.begin().await?;
        if !queries::insert_run_within(&mut tx, run, &payload, self.max_bytes).await? {
            let used = queries::used_bytes(&mut tx).await?;
            tx.rollback().await?;
            tracing::warn!(id = %run.id(), used, incoming, limit = self.max_bytes, "history full");
            return Err(HistoryError::StorageFull {
                required: used.saturating_add(incoming),
                limit: self.max_bytes,
            }
            .into());
        }
        tx.commit().await?;

        tracing::debug!(id = %run.id(), bytes = incoming, "run saved");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<BatchRun>, Error> {
        let mut tx = self.pool.begin().await?;
        let stored = queries::list_runs(&mut tx).await?;
        tx.commit().await?;

        stored
            .iter()
            .map(|row| decode_run(&row.id, &row.payload))
            .collect()
    }

    async fn get(&self, id: RunId) -> Result<Option<BatchRun>, Error> {
        let mut tx = self.pool.begin().await?;
        let stored = queries::get_run(&mut tx, &id).await?;
        tx.commit().await?;

        stored
            .map(|row| decode_run(&row.id, &row.payload))
            .transpose()
    }
}
