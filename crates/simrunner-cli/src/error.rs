//! CLI error types

use simrunner_process::ProcessError;
use thiserror::Error;

/// Session configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load session: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::Process(e) if e.is_not_found() => {
                format!("{}\n\nCheck the executable and working directory paths.", e)
            }
            CliError::Process(e) => e.to_string(),
            CliError::Config(e) => {
                format!("{}\n\nRun 'simrunner run --help' for the session file format.", e)
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
