//! Error types for process management

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::process::ProcessState;

/// Process management errors
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable path does not exist or is not a file
    #[error("File does not exist: \"{}\"", .path.display())]
    ExecutableNotFound { path: PathBuf },

    /// Working directory does not exist or is not a directory
    #[error("Working directory does not exist: \"{}\"", .path.display())]
    WorkingDirNotFound { path: PathBuf },

    /// Output log file could not be created
    #[error("Failed to open log file \"{}\": {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The OS refused to launch the executable
    #[error("Process \"{name}\" could not be started: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    /// Signalling or reaping a running process failed
    #[error("Process \"{name}\" could not be terminated: {reason}")]
    Terminate { name: String, reason: String },

    /// Operation not allowed in the current lifecycle state
    #[error("Process \"{id}\" is {state}, operation not allowed")]
    InvalidState { id: String, state: ProcessState },

    /// No process registered under this id
    #[error("No process ID with name: \"{id}\"")]
    UnknownId { id: String },

    /// A process is already registered under this id
    #[error("Process ID already in use: \"{id}\"")]
    DuplicateId { id: String },

    /// Stop-all requested with nothing registered
    #[error("There is no simulation process currently running to be stopped")]
    EmptyRegistry,
}

impl ProcessError {
    /// True for the two validation failures raised before anything touches the filesystem
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ProcessError::ExecutableNotFound { .. } | ProcessError::WorkingDirNotFound { .. }
        )
    }
}

/// Result type for process operations
pub type Result<T> = std::result::Result<T, ProcessError>;
