use crate::WatchdogResult;

use gp_config::{Config, DEFAULT_CONFIG_FILENAME, LogLevel};

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "gpanel")]
#[command(about = "Keeps a Source dedicated server alive: probes it, restarts it when it stops answering and once a day")]
#[command(version)]
pub struct Cli {
    /// Settings document (JSON, or TOML when the extension is .toml)
    #[arg(long, default_value = DEFAULT_CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Diagnostic mode: never launch the server and log at debug level
    #[arg(long = "test", visible_alias = "dry-run")]
    pub dry_run: bool,

    /// Override the configured log level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Load and validate the settings document named on the command line.
    pub fn load_config(&self) -> WatchdogResult<Config> {
        let config = Config::load(&self.config)?;
        config.validate()?;
        Ok(config)
    }

    /// `--log-level` wins, then diagnostic mode forces debug, then the config.
    pub fn effective_log_level(&self, config: &Config) -> LogLevel {
        match self.log_level {
            Some(ref level) => LogLevel::parse_lenient(level),
            None if self.dry_run => LogLevel(LevelFilter::Debug),
            None => config.logging.level,
        }
    }
}
