//! Stored run queries and export

use crate::{ExportReport, OpsCtx, RunListing};
use chrono::Utc;
use mailcheck_errors::{Error, OpsError};
use mailcheck_events::EventEmitter;
use mailcheck_export::{export_file_name, write_csv};
use mailcheck_types::{BatchRun, ExportFilter, RunId};
use std::path::PathBuf;

/// List stored runs, most recently saved first
///
/// # Errors
///
/// Returns an error if the history store cannot be read.
pub async fn history(ctx: &OpsCtx) -> Result<Vec<RunListing>, Error> {
    let runs = ctx.history.list_all().await?;
    Ok(runs.iter().map(RunListing::from).collect())
}

/// Fetch one stored run by its id string
///
/// # Errors
///
/// Returns an error if the id is malformed, no such run exists, or the
/// store cannot be read.
pub async fn get_run(ctx: &OpsCtx, id: &str) -> Result<BatchRun, Error> {
    let run_id: RunId = id.trim().parse().map_err(|_| OpsError::InvalidRunId {
        id: id.to_string(),
    })?;

    ctx.history
        .get(run_id)
        .await?
        .ok_or_else(|| OpsError::RunNotFound { id: id.to_string() }.into())
}

/// Re-export a stored run
///
/// # Errors
///
/// Returns an error if the run cannot be found or the file cannot be written.
pub async fn export_run(
    ctx: &OpsCtx,
    id: &str,
    filter: ExportFilter,
    output: Option<PathBuf>,
) -> Result<ExportReport, Error> {
    let run = get_run(ctx, id).await?;
    export_to(ctx, &run, filter, output).await
}

/// Write a run's verdicts to `output`, or to the conventional file name in
/// the current directory
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub async fn export_to(
    ctx: &OpsCtx,
    run: &BatchRun,
    filter: ExportFilter,
    output: Option<PathBuf>,
) -> Result<ExportReport, Error> {
    ctx.emit_operation_started("export");

    let path = output.unwrap_or_else(|| {
        PathBuf::from(export_file_name(
            run.source_name(),
            filter,
            Utc::now().date_naive(),
        ))
    });
    let result = write_csv(&path, run.verdicts(), filter).await;
    ctx.emit_operation_completed("export", result.is_ok());

    Ok(ExportReport {
        run_id: run.id(),
        path,
        filter,
        rows: result?,
    })
}
