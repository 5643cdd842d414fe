//! Periodic batch resync.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::progress::ProgressReporter;
use crate::registration::RegistrationService;
use crate::traits::{ProviderAdapter, RegistryGateway};

/// Runs a batch resync every `interval` until `cancel_token` fires.
///
/// The first run starts after one full interval. A run that fails to list
/// the registered datasets is logged and the loop continues. A zero interval
/// disables the schedule and returns immediately.
///
/// Returns the number of runs started.
pub async fn run_scheduled_resync<P, G, R>(
    service: &RegistrationService<P, G>,
    interval: Duration,
    reporter: &R,
    cancel_token: CancellationToken,
) -> u64
where
    P: ProviderAdapter,
    G: RegistryGateway,
    R: ProgressReporter,
{
    if interval.is_zero() {
        info!("Scheduled resync disabled");
        return 0;
    }

    info!(interval_secs = interval.as_secs(), "Scheduled resync started");
    let mut runs = 0;

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }

        runs += 1;
        info!(run = runs, "Running scheduled resync");
        match service
            .batch_resync_with_progress_cancellable(reporter, cancel_token.clone())
            .await
        {
            Ok(summary) => {
                info!(
                    run = runs,
                    listed = summary.listed,
                    updated = summary.updated,
                    failed = summary.failed,
                    cancelled = summary.cancelled,
                    "Scheduled resync finished"
                );
            }
            Err(e) => {
                error!(run = runs, error = %e, "Error in scheduled resync");
            }
        }

        if cancel_token.is_cancelled() {
            break;
        }
    }

    info!(runs, "Scheduled resync stopped");
    runs
}
