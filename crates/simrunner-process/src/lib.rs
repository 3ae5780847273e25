//! # simrunner-process
//!
//! **Purpose**: Launch, track and tear down external simulation executables
//!
//! ## Features
//!
//! - **Validation**: Executable and working directory are checked before anything is spawned
//! - **Output Capture**: stdout and stderr of each process go to `<working dir>/<name>.log`
//! - **Registry**: Running processes are keyed by a caller-supplied id
//! - **Bounded Shutdown**: SIGTERM, a grace period (20s by default), then kill
//!
//! ## Usage
//!
//! ```rust,no_run
//! use simrunner_process::{LifecycleConfig, ProcessDescriptor, ProcessRegistry};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ProcessRegistry::with_config(LifecycleConfig::default().grace_period_secs(10));
//!
//! let descriptor = ProcessDescriptor::new("sim/NEC_V850_proj.exe", "JCP").working_dir("sim");
//! registry.start_process(descriptor).await?;
//!
//! // Teardown
//! registry.stop_all_processes().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod process;
pub mod registry;

pub use config::{LifecycleConfig, ProcessDescriptor, DEFAULT_GRACE_PERIOD};
pub use error::{ProcessError, Result};
pub use process::{ProcessState, SimProcess, StopOutcome};
pub use registry::{ProcessRegistry, StopReport};
