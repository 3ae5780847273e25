//! Terminal output for command results

use colored::Colorize;
use simrunner_process::{StopOutcome, StopReport};

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format warning message
    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// One line per stopped process
    pub fn stop_report(&self, report: &StopReport) -> String {
        match &report.outcome {
            Ok(StopOutcome::Exited(status)) => {
                self.success(&format!("{}: exited ({})", report.id, status))
            }
            Ok(StopOutcome::Killed) => {
                self.warning(&format!("{}: killed after grace period", report.id))
            }
            Err(e) => self.error(&format!("{}: {}", report.id, e)),
        }
    }
}

/// Print a success message to stdout
pub fn print_success(msg: &str) {
    println!("{}", OutputStyle::default().success(msg));
}

/// Print an error message to stderr
pub fn print_error(msg: &str) {
    eprintln!("{}", OutputStyle::default().error(msg));
}
