//! Simulation commands bound by the test harness
//!
//! Each command is a thin wrapper over [`ProcessRegistry`]; the registry is
//! owned by the caller and borrowed here.

use std::path::PathBuf;

use simrunner_process::{ProcessDescriptor, ProcessRegistry};
use tracing::warn;

use crate::error::CliResult;

/// Start / stop / stop-all commands over a borrowed registry
pub struct SimulationCommands<'a> {
    registry: &'a ProcessRegistry,
}

impl<'a> SimulationCommands<'a> {
    pub fn new(registry: &'a ProcessRegistry) -> Self {
        Self { registry }
    }

    /// Start a simulation process and return its id
    ///
    /// | ${process} = | start simulation process | path/NEC_V850_proj.exe | JCP | path |
    pub async fn start_simulation_process(
        &self,
        executable: impl Into<PathBuf>,
        process_id: &str,
        working_dir: Option<PathBuf>,
    ) -> CliResult<String> {
        let mut descriptor = ProcessDescriptor::new(executable, process_id);
        descriptor.working_dir = working_dir;
        Ok(self.registry.start_process(descriptor).await?)
    }

    /// Stop one simulation process by id
    pub async fn stop_simulation_process(&self, process_id: &str) -> CliResult<()> {
        self.registry.stop_process(process_id).await?;
        Ok(())
    }

    /// Stop every running simulation process
    pub async fn stop_all_simulation_processes(&self) -> CliResult<()> {
        let reports = self.registry.stop_all_processes().await?;
        let failed = reports.iter().filter(|r| r.outcome.is_err()).count();
        if failed > 0 {
            warn!(failed, total = reports.len(), "Some processes did not stop cleanly");
        }
        Ok(())
    }
}
