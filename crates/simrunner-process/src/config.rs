//! Process descriptors and lifecycle settings

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Grace period granted to a process between terminate and kill
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(20);

/// Everything needed to launch one simulation process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDescriptor {
    /// Caller-chosen identifier, unique within a registry
    pub id: String,
    /// Path to the executable
    pub executable: PathBuf,
    /// Working directory (None = current dir)
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    /// Command arguments
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment variables (added to parent env)
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl ProcessDescriptor {
    /// Create a descriptor for `executable` registered as `id`
    pub fn new(executable: impl Into<PathBuf>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            executable: executable.into(),
            working_dir: None,
            args: vec![],
            env: HashMap::new(),
        }
    }

    /// Set working directory
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set command arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Add environment variable
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// Settings shared by every process of a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// How long `stop` waits for a graceful exit before killing
    pub grace_period: Duration,
}

impl LifecycleConfig {
    /// Set grace period in seconds
    pub fn grace_period_secs(mut self, secs: u64) -> Self {
        self.grace_period = Duration::from_secs(secs);
        self
    }

    /// Set grace period duration
    pub fn grace_period(mut self, duration: Duration) -> Self {
        self.grace_period = duration;
        self
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }
}
