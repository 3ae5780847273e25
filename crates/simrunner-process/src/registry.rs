//! Process registry - id-keyed lifecycle orchestration

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use futures::future::join_all;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::{
    config::{LifecycleConfig, ProcessDescriptor},
    error::{ProcessError, Result},
    process::{SimProcess, StopOutcome, LOG_TARGET},
};

/// Result of stopping one process during [`ProcessRegistry::stop_all_processes`]
#[derive(Debug)]
pub struct StopReport {
    /// Id the process was registered under
    pub id: String,
    /// How the process ended, or why stopping it failed
    pub outcome: Result<StopOutcome>,
}

/// Owns every running simulation process, keyed by id
///
/// An id is present only between a successful start and the matching stop.
/// The map lock is never held while waiting for a process to exit.
pub struct ProcessRegistry {
    processes: Mutex<HashMap<String, SimProcess>>,
    config: LifecycleConfig,
}

impl ProcessRegistry {
    /// Create an empty registry with the default 20s grace period
    pub fn new() -> Self {
        Self::with_config(LifecycleConfig::default())
    }

    /// Create an empty registry with custom lifecycle settings
    pub fn with_config(config: LifecycleConfig) -> Self {
        Self {
            processes: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Lifecycle settings applied to every process
    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Validate, start and register a process
    ///
    /// Returns the registered id. Nothing is registered when validation or
    /// spawning fails, and an id that is already taken is rejected.
    ///
    /// # Examples
    /// ```no_run
    /// use simrunner_process::{ProcessDescriptor, ProcessRegistry};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let registry = ProcessRegistry::new();
    /// let descriptor = ProcessDescriptor::new("sim/app.exe", "JCP").working_dir("sim");
    /// let id = registry.start_process(descriptor).await?;
    /// registry.stop_process(&id).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn start_process(&self, descriptor: ProcessDescriptor) -> Result<String> {
        if self.contains(&descriptor.id) {
            return Err(ProcessError::DuplicateId { id: descriptor.id });
        }

        let mut process = SimProcess::new(descriptor)?;
        process.start().await?;

        let id = process.id().to_string();
        let rejected = {
            let mut processes = self.processes.lock();
            match processes.entry(id.clone()) {
                Entry::Occupied(_) => Some(process),
                Entry::Vacant(slot) => {
                    slot.insert(process);
                    None
                }
            }
        };

        // Another caller registered the same id while we were spawning
        if let Some(mut process) = rejected {
            warn!(target: LOG_TARGET, id = %id, "Id taken during start, stopping duplicate");
            if let Err(e) = process.stop(self.config.grace_period).await {
                warn!(target: LOG_TARGET, id = %id, error = %e, "Failed to stop duplicate process");
            }
            return Err(ProcessError::DuplicateId { id });
        }

        debug!(target: LOG_TARGET, id = %id, "Process registered");
        Ok(id)
    }

    /// Remove a process from the registry and stop it
    pub async fn stop_process(&self, id: &str) -> Result<StopOutcome> {
        let removed = self.processes.lock().remove(id);
        let Some(mut process) = removed else {
            return Err(ProcessError::UnknownId { id: id.to_string() });
        };

        process.stop(self.config.grace_period).await
    }

    /// Stop every registered process and leave the registry empty
    ///
    /// Processes are stopped concurrently. A failure to stop one of them is
    /// reported in its [`StopReport`] and does not keep it registered.
    pub async fn stop_all_processes(&self) -> Result<Vec<StopReport>> {
        let drained: Vec<SimProcess> = {
            let mut processes = self.processes.lock();
            if processes.is_empty() {
                return Err(ProcessError::EmptyRegistry);
            }
            processes.drain().map(|(_, process)| process).collect()
        };

        info!(target: LOG_TARGET, count = drained.len(), "Stopping all processes");

        let grace_period = self.config.grace_period;
        let mut reports = join_all(drained.into_iter().map(|mut process| async move {
            let outcome = process.stop(grace_period).await;
            StopReport {
                id: process.id().to_string(),
                outcome,
            }
        }))
        .await;
        reports.sort_by(|a, b| a.id.cmp(&b.id));

        for report in &reports {
            if let Err(e) = &report.outcome {
                warn!(target: LOG_TARGET, id = %report.id, error = %e, "Process did not stop cleanly");
            }
        }

        Ok(reports)
    }

    /// Number of registered processes
    pub fn len(&self) -> usize {
        self.processes.lock().len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.processes.lock().is_empty()
    }

    /// Whether `id` is registered
    pub fn contains(&self, id: &str) -> bool {
        self.processes.lock().contains_key(id)
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.processes.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// OS process id of a registered process
    pub fn pid(&self, id: &str) -> Option<u32> {
        self.processes.lock().get(id).and_then(SimProcess::pid)
    }
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}
