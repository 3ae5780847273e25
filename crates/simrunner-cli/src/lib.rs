//! # simrunner
//!
//! Command layer over [`simrunner_process`]: the start / stop / stop-all
//! simulation commands, session files, logging setup and terminal output.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod session;

pub use crate::commands::SimulationCommands;
pub use crate::config::SessionConfig;
pub use crate::error::{CliError, CliResult, ConfigError};
pub use crate::session::run_session;
