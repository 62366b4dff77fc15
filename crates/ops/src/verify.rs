//! Single and bulk verification

use crate::{BulkReport, OpsCtx};
use chrono::Utc;
use mailcheck_errors::{Error, OpsError};
use mailcheck_events::{EventEmitter, FailureContext};
use mailcheck_types::{default_source_name, Address, BatchRun, Verdict};

/// Verify one address
///
/// Oracle failures become an `Error` verdict. Single checks are not
/// recorded in history.
///
/// # Errors
///
/// Returns an error if `email` is empty.
pub async fn verify_single(ctx: &OpsCtx, email: &str) -> Result<Verdict, Error> {
    if email.trim().is_empty() {
        return Err(OpsError::NoAddresses.into());
    }

    ctx.emit_operation_started("verify");
    let verdict = match ctx.oracle.verify(email).await {
        Ok(answer) => answer.into_verdict(email),
        Err(e) => {
            tracing::debug!(email, error = %e, "oracle call failed");
            Verdict::unreachable(email)
        }
    };
    ctx.emit_operation_completed("verify", true);
    Ok(verdict)
}

/// Verify a list of addresses and record the run
///
/// Runs the scheduler over `addresses`, builds the run (named
/// `source_name`, or `Bulk_<date>.csv`) and saves it. A failed save is
/// reported in the returned report and as a `SaveFailed` event; the run
/// itself is returned either way.
pub async fn verify_bulk(
    ctx: &OpsCtx,
    source_name: Option<String>,
    addresses: &[Address],
) -> BulkReport {
    ctx.emit_operation_started("bulk");

    let verdicts = ctx
        .scheduler
        .run(ctx.oracle.as_ref(), addresses, &ctx.tx)
        .await;

    let name = source_name.unwrap_or_else(|| default_source_name(Utc::now().date_naive()));
    let run = BatchRun::new(name, verdicts);

    let save_error = match ctx.history.save(&run).await {
        Ok(()) => {
            ctx.emit_run_saved(run.id(), run.source_name());
            None
        }
        Err(e) => {
            tracing::warn!(id = %run.id(), error = %e, "failed to save run");
            let failure = FailureContext::from_error(&e);
            ctx.emit_save_failed(run.id(), failure.clone());
            Some(failure)
        }
    };

    ctx.emit_operation_completed("bulk", save_error.is_none());
    BulkReport { run, save_error }
}
