//! SQL queries over the `runs` table

use mailcheck_errors::Error;
use mailcheck_types::{BatchRun, RunId};
use sqlx::{query, Row, Sqlite, Transaction};

/// A stored run as read back from the database, before decoding
#[derive(Debug, Clone)]
pub struct StoredRun {
    pub id: String,
    pub payload: String,
}

/// Total serialized size of all stored runs
pub async fn used_bytes(tx: &mut Transaction<'_, Sqlite>) -> Result<u64, Error> {
    let row = query("SELECT COALESCE(SUM(payload_bytes), 0) AS used FROM runs")
        .fetch_one(&mut **tx)
        .await?;
    let used: i64 = row.get("used");
    Ok(used.max(0) as u64)
}

/// Insert a run if the byte budget still allows it
///
/// The capacity test and the insert are a single statement, so two
/// concurrent savers cannot both squeeze under the limit. Returns `false`
/// when the row was not written.
pub async fn insert_run_within(
    tx: &mut Transaction<'_, Sqlite>,
    run: &BatchRun,
    payload: &str,
    limit: u64,
) -> Result<bool, Error> {
    let summary = run.summary();
    let result = query(
        "INSERT INTO runs
             (id, source_name, created_at, total, good, risky, bad, error, payload, payload_bytes)
         SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10
         WHERE (SELECT COALESCE(SUM(payload_bytes), 0) FROM runs) + ?10 <= ?11",
    )
    .bind(run.id().to_string())
    .bind(run.source_name())
    .bind(run.created_at().to_rfc3339())
    .bind(summary.total() as i64)
    .bind(summary.good as i64)
    .bind(summary.risky as i64)
    .bind(summary.bad as i64)
    .bind(summary.error as i64)
    .bind(payload)
    .bind(payload.len() as i64)
    .bind(limit.min(i64::MAX as u64) as i64)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// All runs, newest insertion first
pub async fn list_runs(tx: &mut Transaction<'_, Sqlite>) -> Result<Vec<StoredRun>, Error> {
    let rows = query("SELECT id, payload FROM runs ORDER BY seq DESC")
        .fetch_all(&mut **tx)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| StoredRun {
            id: row.get("id"),
            payload: row.get("payload"),
        })
        .collect())
}

/// One run by id
pub async fn get_run(
    tx: &mut Transaction<'_, Sqlite>,
    id: &RunId,
) -> Result<Option<StoredRun>, Error> {
    let row = query("SELECT id, payload FROM runs WHERE id = ?1")
        .bind(id.to_string())
        .fetch_optional(&mut **tx)
        .await?;

    Ok(row.map(|row| StoredRun {
        id: row.get("id"),
        payload: row.get("payload"),
    }))
}
