//! Session file loading
//!
//! A session lists the processes to launch together plus shared settings.
//! Values come from a TOML file, overridden by `SIMRUNNER_*` environment
//! variables (e.g. `SIMRUNNER_GRACE_PERIOD_SECS=5`).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use simrunner_process::{LifecycleConfig, ProcessDescriptor, DEFAULT_GRACE_PERIOD};

use crate::error::ConfigError;

/// Environment prefix for overrides
const ENV_PREFIX: &str = "SIMRUNNER";

/// Processes launched together by `simrunner run`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds to wait for a graceful exit before killing
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,
    /// Log level for simrunner itself
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Processes, started in order
    #[serde(default)]
    pub processes: Vec<ProcessDescriptor>,
}

fn default_grace_period_secs() -> u64 {
    DEFAULT_GRACE_PERIOD.as_secs()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl SessionConfig {
    /// Load, resolve and validate a session file
    ///
    /// Relative executable and working directory paths are resolved against
    /// the directory holding the session file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(true))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let mut session: SessionConfig = settings.try_deserialize()?;
        if let Some(base) = path.parent() {
            session.resolve_paths(base);
        }
        session.validate()?;
        Ok(session)
    }

    /// Lifecycle settings for the registry
    pub fn lifecycle(&self) -> LifecycleConfig {
        LifecycleConfig::default().grace_period_secs(self.grace_period_secs)
    }

    /// Check settings that deserialization alone can't enforce
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grace_period_secs == 0 {
            return Err(ConfigError::Validation(
                "grace_period_secs must be greater than 0".to_string(),
            ));
        }
        if self.processes.is_empty() {
            return Err(ConfigError::Validation(
                "session lists no processes".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for process in &self.processes {
            if process.id.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "process \"{}\" has an empty id",
                    process.executable.display()
                )));
            }
            if !seen.insert(process.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "process id \"{}\" is listed more than once",
                    process.id
                )));
            }
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        for process in &mut self.processes {
            process.executable = resolve(base, &process.executable);
            if let Some(dir) = process.working_dir.take() {
                process.working_dir = Some(resolve(base, &dir));
            }
        }
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(ids: &[&str]) -> SessionConfig {
        SessionConfig {
            grace_period_secs: 20,
            log_level: default_log_level(),
            processes: ids
                .iter()
                .map(|id| ProcessDescriptor::new("app.exe", *id))
                .collect(),
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(session(&["JCP", "JGP"]).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let err = session(&["JCP", "JCP"]).validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(session(&[]).validate().is_err());
        assert!(session(&[" "]).validate().is_err());

        let mut zero_grace = session(&["JCP"]);
        zero_grace.grace_period_secs = 0;
        assert!(zero_grace.validate().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_paths() {
        let mut config = session(&["JCP"]);
        config.processes[0].working_dir = Some(PathBuf::from("sim"));
        config.resolve_paths(Path::new("/opt/bench"));

        assert_eq!(config.processes[0].executable, PathBuf::from("/opt/bench/app.exe"));
        assert_eq!(
            config.processes[0].working_dir,
            Some(PathBuf::from("/opt/bench/sim"))
        );
    }

    #[test]
    fn test_lifecycle() {
        let mut config = session(&["JCP"]);
        config.grace_period_secs = 7;
        assert_eq!(config.lifecycle().grace_period.as_secs(), 7);
    }
}
