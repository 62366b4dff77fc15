#![deny(clippy::pedantic, unsafe_code)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::missing_panics_doc
)]
#![allow(clippy::module_name_repetitions)]

//! Run history persistence for mailcheck
//!
//! A completed [`BatchRun`] is saved as one durable record and can be read
//! back later for display or re-export. Records are never modified after
//! they are written. Saving either stores the whole run or nothing.
//!
//! Capacity is a byte budget over the serialized runs. A save that would
//! exceed it fails with `HistoryError::StorageFull` and leaves the store
//! untouched.

mod memory;
pub mod queries;
mod sqlite;

pub use memory::MemoryHistoryStore;
pub use sqlite::SqliteHistoryStore;

use async_trait::async_trait;
use mailcheck_errors::{Error, HistoryError};
use mailcheck_types::{BatchRun, RunId};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::Duration;

/// Durable storage of completed batch runs
#[async_trait]
pub trait RunHistoryStore: Send + Sync {
    /// Persist a run atomically
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::StorageFull` when the run does not fit the
    /// byte budget, or a database/serialization error. Nothing is written
    /// in either case.
    async fn save(&self, run: &BatchRun) -> Result<(), Error>;

    /// All stored runs, most recently saved first
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or a record is corrupted.
    async fn list_all(&self) -> Result<Vec<BatchRun>, Error>;

    /// Look up a single run
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the record is corrupted.
    async fn get(&self, id: RunId) -> Result<Option<BatchRun>, Error>;
}

/// Serialize a run into its stored JSON form
pub(crate) fn encode_run(run: &BatchRun) -> Result<String, Error> {
    Ok(serde_json::to_string(run)?)
}

/// Rebuild a run from its stored JSON form
pub(crate) fn decode_run(id: &str, payload: &str) -> Result<BatchRun, Error> {
    serde_json::from_str(payload).map_err(|e| {
        HistoryError::Corrupted {
            id: id.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Fail with `StorageFull` when `incoming` more bytes would not fit
pub(crate) fn check_capacity(used: u64, incoming: u64, limit: u64) -> Result<(), Error> {
    let required = used.saturating_add(incoming);
    if required > limit {
        return Err(HistoryError::StorageFull { required, limit }.into());
    }
    Ok(())
}

/// Create a new `SQLite` connection pool
///
/// # Errors
///
/// Returns an error if the database connection fails or configuration is invalid.
pub async fn create_pool(db_path: &Path) -> Result<Pool<Sqlite>, Error> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .pragma("temp_store", "MEMORY")
        .busy_timeout(Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| HistoryError::Database {
            message: e.to_string(),
        })?;

    Ok(pool)
}

/// Run database migrations
///
/// # Errors
///
/// Returns an error if any migration fails to execute.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), Error> {
    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        HistoryError::MigrationFailed {
            message: e.to_string(),
        }
        .into()
    })
}
