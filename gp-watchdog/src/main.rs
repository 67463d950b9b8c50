use gp_watchdog::{Cli, logger, watchdog};

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load and validate configuration
    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logger (before any other logging)
    let log_file = config.logging.file.as_ref().map(PathBuf::from);
    if let Err(e) = logger::initialize(
        cli.effective_log_level(&config),
        log_file,
        config.logging.colored,
    ) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    info!("Starting gpanel v{}", env!("CARGO_PKG_VERSION"));
    if cli.dry_run {
        warn!("Diagnostic mode: the server will never be launched");
    }
    config.log_summary();

    match watchdog::run(&config, cli.dry_run).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
