mod config;
mod error;
mod log_level;
mod logging_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;

pub const DEFAULT_CONFIG_FILENAME: &str = "config.json";

const DEFAULT_SERVER_IP: &str = "127.0.0.1";
const DEFAULT_SERVER_PORT: u16 = 27015;
const DEFAULT_CHECK_INTERVAL_SECS: u64 = 30;
const DEFAULT_MAX_FAILS: u32 = 3;
const DEFAULT_AUTO_RESTART_HOUR: u8 = 3;
const DEFAULT_PROBE_TIMEOUT_MS: u64 = 3000;
const DEFAULT_RESTART_GRACE_SECS: u64 = 10;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_COLORED: bool = true;

const MAX_AUTO_RESTART_HOUR: u8 = 23;
const MAX_CHECK_INTERVAL_SECS: u64 = 86_400;
const MAX_PROBE_TIMEOUT_MS: u64 = 60_000;
