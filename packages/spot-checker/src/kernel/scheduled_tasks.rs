//! Scheduled spot checks using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (cron expression)
//!     │
//!     └─► try_lock(run guard) ── busy ──► skip tick
//!             └─► run_and_log(checker)
//! ```
//!
//! The snapshot file has no locking of its own, so ticks must never
//! overlap: a tick that fires while the previous run is still going is
//! dropped, and the next tick compares against whatever that run stored.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::common::CheckError;
use crate::domains::availability::{run_and_log, SpotChecker};

/// Accept classic five-field cron by pinning seconds to zero.
///
/// The scheduler wants `sec min hour day-of-month month day-of-week [year]`.
pub fn normalize_cron(expression: &str) -> String {
    let expression = expression.trim();
    if expression.split_whitespace().count() == 5 {
        format!("0 {}", expression)
    } else {
        expression.to_string()
    }
}

/// Build the recurring spot-check job without starting it
pub fn spot_check_job(checker: Arc<SpotChecker>, expression: &str) -> Result<Job, CheckError> {
    let schedule = normalize_cron(expression);
    let run_guard = Arc::new(Mutex::new(()));

    Job::new_async(schedule.as_str(), move |_uuid, _lock| {
        let checker = checker.clone();
        let run_guard = run_guard.clone();
        Box::pin(async move {
            let Ok(_running) = run_guard.try_lock() else {
                tracing::warn!("Previous spot check still running, skipping this tick");
                return;
            };

            // Errors are already logged; the next tick retries from the stored snapshot
            let _ = run_and_log(&checker).await;
        })
    })
    .map_err(|e| CheckError::ScheduleParse {
        expression: expression.to_string(),
        reason: e.to_string(),
    })
}

/// Start the scheduler with the spot-check job
pub async fn start_scheduler(checker: Arc<SpotChecker>, expression: &str) -> Result<JobScheduler> {
    // Parse before anything starts so a bad expression is a startup error
    let job = spot_check_job(checker, expression)?;

    let scheduler = JobScheduler::new().await?;
    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(schedule = %normalize_cron(expression), "Scheduled spot checks started");
    Ok(scheduler)
}
