//! Foreground session: start everything, wait, tear everything down

use std::future::Future;

use simrunner_process::{ProcessRegistry, StopReport};
use tracing::{error, info};

use crate::config::SessionConfig;
use crate::error::CliResult;

/// Run a session until `shutdown` resolves
///
/// Processes start in the order listed. If one fails to start, the ones
/// already running are stopped and the start error is returned.
pub async fn run_session<F>(session: &SessionConfig, shutdown: F) -> CliResult<Vec<StopReport>>
where
    F: Future<Output = ()>,
{
    let registry = ProcessRegistry::with_config(session.lifecycle());

    for descriptor in &session.processes {
        if let Err(e) = registry.start_process(descriptor.clone()).await {
            error!(id = %descriptor.id, error = %e, "Session start aborted");
            if !registry.is_empty() {
                registry.stop_all_processes().await?;
            }
            return Err(e.into());
        }
    }

    info!(count = registry.len(), "Session running, waiting for shutdown");
    shutdown.await;

    Ok(registry.stop_all_processes().await?)
}

/// Resolves on Ctrl-C
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C, shutting down");
    }
}
