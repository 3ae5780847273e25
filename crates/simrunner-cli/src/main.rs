// simrunner CLI entry point

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use simrunner_cli::{logging, output, session, CliError, SessionConfig, SimulationCommands};
use simrunner_process::{LifecycleConfig, ProcessRegistry};

#[derive(Parser)]
#[command(name = "simrunner", version)]
#[command(about = "Launch simulation executables and tear them down cleanly")]
struct Cli {
    /// Debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start every process of a session file, stop them all on Ctrl-C
    Run {
        /// Session file (TOML)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Start a single process, stop it on Ctrl-C
    Start {
        /// Path to the executable
        executable: PathBuf,

        /// Process id
        #[arg(long)]
        id: String,

        /// Working directory (defaults to the current directory)
        #[arg(short, long)]
        workdir: Option<PathBuf>,

        /// Seconds to wait for a graceful exit before killing
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
        grace_period_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config } => run(&config, cli.verbose, cli.quiet).await,
        Commands::Start {
            executable,
            id,
            workdir,
            grace_period_secs,
        } => {
            logging::init_logging(logging::effective_level(cli.verbose, cli.quiet, None));
            start(executable, &id, workdir, grace_period_secs).await
        }
    };

    if let Err(e) = result {
        output::print_error(&e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(config: &Path, verbose: bool, quiet: bool) -> Result<(), CliError> {
    let session_config = SessionConfig::load(config)?;
    logging::init_logging(logging::effective_level(
        verbose,
        quiet,
        Some(session_config.log_level.as_str()),
    ));

    let reports = session::run_session(&session_config, session::ctrl_c()).await?;

    let style = output::OutputStyle::default();
    for report in &reports {
        println!("{}", style.stop_report(report));
    }
    Ok(())
}

async fn start(
    executable: PathBuf,
    id: &str,
    workdir: Option<PathBuf>,
    grace_period_secs: u64,
) -> Result<(), CliError> {
    let registry =
        ProcessRegistry::with_config(LifecycleConfig::default().grace_period_secs(grace_period_secs));
    let commands = SimulationCommands::new(&registry);

    let id = commands
        .start_simulation_process(executable, id, workdir)
        .await?;
    output::print_success(&format!("{} started, press Ctrl-C to stop", id));

    session::ctrl_c().await;
    commands.stop_simulation_process(&id).await
}
