//! Managed simulation process

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use normpath::PathExt;
use tokio::process::{Child, Command};
use tracing::{debug, error, info, warn};

use crate::{
    config::ProcessDescriptor,
    error::{ProcessError, Result},
};

/// Target used for every lifecycle event
pub(crate) const LOG_TARGET: &str = "simulation";

/// Extension of the file receiving stdout and stderr
const LOG_FILE_EXT: &str = "log";

/// Lifecycle state of a [`SimProcess`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Validated, log file open, not spawned yet
    Idle,
    /// OS process spawned and owned
    Running,
    /// OS handle and log file released
    Stopped,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessState::Idle => write!(f, "idle"),
            ProcessState::Running => write!(f, "running"),
            ProcessState::Stopped => write!(f, "stopped"),
        }
    }
}

/// How a running process ended during [`SimProcess::stop`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Exited on its own within the grace period
    Exited(ExitStatus),
    /// Still alive after the grace period, forcibly killed
    Killed,
}

impl StopOutcome {
    /// Whether the grace period ran out
    pub fn was_killed(&self) -> bool {
        matches!(self, StopOutcome::Killed)
    }
}

/// One external simulation executable and the resources it owns
pub struct SimProcess {
    id: String,
    name: String,
    executable: PathBuf,
    working_dir: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
    log_path: PathBuf,
    log: Option<File>,
    child: Option<Child>,
    state: ProcessState,
}

impl SimProcess {
    /// Validate a descriptor and open its log file
    ///
    /// The executable is checked first, then the working directory. Nothing
    /// is written to disk unless both checks pass.
    pub fn new(descriptor: ProcessDescriptor) -> Result<Self> {
        let ProcessDescriptor {
            id,
            executable,
            working_dir,
            args,
            env,
        } = descriptor;

        let (executable, name) = validate_executable(&executable)?;

        let working_dir = match working_dir {
            Some(dir) => validate_working_dir(&dir)?,
            None => {
                let cwd = std::env::current_dir().map_err(|_| ProcessError::WorkingDirNotFound {
                    path: PathBuf::from("."),
                })?;
                warn!(
                    target: LOG_TARGET,
                    name = %name,
                    cwd = %cwd.display(),
                    "No working directory configured for process, current working directory will be used"
                );
                cwd
            }
        };

        let log_path = working_dir.join(log_file_name(&name));
        let log = File::create(&log_path).map_err(|source| ProcessError::LogFile {
            path: log_path.clone(),
            source,
        })?;

        info!(
            target: LOG_TARGET,
            id = %id,
            executable = %executable.display(),
            "New process created"
        );

        Ok(Self {
            id,
            name,
            executable,
            working_dir,
            args,
            env,
            log_path,
            log: Some(log),
            child: None,
            state: ProcessState::Idle,
        })
    }

    /// Caller-supplied identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Executable file name, extension included
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized executable path
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Normalized working directory
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// File receiving stdout and stderr
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Current lifecycle state
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// OS process id while running
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }

    /// Check if the OS process is still alive
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.as_mut().map(Child::try_wait), Some(Ok(None)))
    }

    /// Spawn the executable with both output streams sent to the log file
    pub async fn start(&mut self) -> Result<()> {
        let log = match (&self.state, &self.log) {
            (ProcessState::Idle, Some(log)) => log,
            _ => return Err(self.invalid_state()),
        };

        let stdout = log.try_clone().map_err(|e| self.spawn_error(e))?;
        let stderr = log.try_clone().map_err(|e| self.spawn_error(e))?;

        debug!(
            target: LOG_TARGET,
            id = %self.id,
            executable = %self.executable.display(),
            args = ?self.args,
            "Spawning process"
        );

        let mut cmd = Command::new(&self.executable);
        cmd.args(&self.args)
            .envs(&self.env)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .kill_on_drop(true);

        match cmd.spawn() {
            Ok(child) => {
                info!(
                    target: LOG_TARGET,
                    name = %self.name,
                    pid = ?child.id(),
                    "Process started"
                );
                self.child = Some(child);
                self.state = ProcessState::Running;
                Ok(())
            }
            Err(e) => {
                error!(
                    target: LOG_TARGET,
                    name = %self.name,
                    error = %e,
                    "Failed to spawn process"
                );
                Err(self.spawn_error(e))
            }
        }
    }

    /// Terminate the process, escalating to a kill after `grace_period`
    ///
    /// The OS handle and the log file are released on every path.
    pub async fn stop(&mut self, grace_period: Duration) -> Result<StopOutcome> {
        let Some(mut child) = self.child.take() else {
            return Err(self.invalid_state());
        };
        let _log = self.log.take();
        self.state = ProcessState::Stopped;

        if let Err(reason) = send_terminate(&mut child) {
            warn!(
                target: LOG_TARGET,
                name = %self.name,
                error = %reason,
                "Failed to send terminate signal"
            );
        }

        match tokio::time::timeout(grace_period, child.wait()).await {
            Ok(Ok(status)) => {
                info!(
                    target: LOG_TARGET,
                    name = %self.name,
                    result = %status,
                    "Process terminated with result code"
                );
                Ok(StopOutcome::Exited(status))
            }
            Ok(Err(e)) => Err(ProcessError::Terminate {
                name: self.name.clone(),
                reason: e.to_string(),
            }),
            Err(_) => {
                debug!(
                    target: LOG_TARGET,
                    name = %self.name,
                    grace_period = ?grace_period,
                    "Grace period expired"
                );
                child.kill().await.map_err(|e| ProcessError::Terminate {
                    name: self.name.clone(),
                    reason: e.to_string(),
                })?;
                info!(target: LOG_TARGET, name = %self.name, "Process killed");
                Ok(StopOutcome::Killed)
            }
        }
    }

    fn invalid_state(&self) -> ProcessError {
        ProcessError::InvalidState {
            id: self.id.clone(),
            state: self.state,
        }
    }

    fn spawn_error(&self, source: std::io::Error) -> ProcessError {
        ProcessError::Spawn {
            name: self.name.clone(),
            source,
        }
    }
}

impl fmt::Debug for SimProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimProcess")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("executable", &self.executable)
            .field("working_dir", &self.working_dir)
            .field("state", &self.state)
            .field("pid", &self.pid())
            .finish()
    }
}

/// Returns the normalized path and the display name
///
/// Symlinks are not resolved: the path as given is the one spawned, so an
/// argv[0]-dispatched binary sees its own name.
fn validate_executable(path: &Path) -> Result<(PathBuf, String)> {
    let not_found = || ProcessError::ExecutableNotFound {
        path: path.to_path_buf(),
    };

    if !path.is_file() {
        return Err(not_found());
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(not_found)?;
    let normalized = normalize_lexically(path).map_err(|_| not_found())?;

    Ok((normalized, name))
}

/// Absolute path with `.` and `..` folded as text
fn normalize_lexically(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

fn validate_working_dir(path: &Path) -> Result<PathBuf> {
    let not_found = || ProcessError::WorkingDirNotFound {
        path: path.to_path_buf(),
    };

    if !path.is_dir() {
        return Err(not_found());
    }
    path.normalize()
        .map(|p| p.into_path_buf())
        .map_err(|_| not_found())
}

/// `app.exe` -> `app.log`
fn log_file_name(name: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    format!("{stem}.{LOG_FILE_EXT}")
}

#[cfg(unix)]
fn send_terminate(child: &mut Child) -> std::result::Result<(), String> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    // None means the child was already reaped
    match child.id() {
        Some(pid) => kill(Pid::from_raw(pid as i32), Signal::SIGTERM).map_err(|e| e.to_string()),
        None => Ok(()),
    }
}

// Windows has no graceful signal for arbitrary processes
#[cfg(not(unix))]
fn send_terminate(child: &mut Child) -> std::result::Result<(), String> {
    child.start_kill().map_err(|e| e.to_string())
}
