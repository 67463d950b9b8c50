use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_AUTO_RESTART_HOUR, DEFAULT_CHECK_INTERVAL_SECS,
    DEFAULT_MAX_FAILS, DEFAULT_PROBE_TIMEOUT_MS, DEFAULT_RESTART_GRACE_SECS, DEFAULT_SERVER_IP,
    DEFAULT_SERVER_PORT, LoggingConfig, MAX_AUTO_RESTART_HOUR, MAX_CHECK_INTERVAL_SECS,
    MAX_PROBE_TIMEOUT_MS,
};

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;
use serde::Deserialize;

/// Watchdog settings document.
///
/// Field names follow the flat `config.json` layout the watchdog has always
/// read, so existing files keep working unchanged.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_ip: String,
    pub server_port: u16,
    /// Binary launched on (re)start
    pub srcds_path: String,
    pub srcds_args: Vec<String>,
    /// Seconds between health probes
    pub check_interval: u64,
    /// Consecutive failed probes before a restart
    pub max_fails: u32,
    /// Local hour (0-23) of the daily forced restart
    pub auto_restart_hour: u8,
    /// Process name to scan for. Defaults to the file name of `srcds_path`
    pub process_name: Option<String>,
    pub probe_timeout_ms: u64,
    /// Probes are suspended this long after a restart (0 = disabled)
    pub restart_grace_secs: u64,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_ip: String::from(DEFAULT_SERVER_IP),
            server_port: DEFAULT_SERVER_PORT,
            srcds_path: String::new(),
            srcds_args: Vec::new(),
            check_interval: DEFAULT_CHECK_INTERVAL_SECS,
            max_fails: DEFAULT_MAX_FAILS,
            auto_restart_hour: DEFAULT_AUTO_RESTART_HOUR,
            process_name: None,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            restart_grace_secs: DEFAULT_RESTART_GRACE_SECS,
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load the settings document at `path`.
    ///
    /// Loading order:
    /// 1. Read the file (missing or unreadable is an error, there is no fallback)
    /// 2. Parse as TOML when the extension is `.toml`, JSON otherwise
    /// 3. Apply GP_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config = Self::parse(path, &contents)?;
        config.apply_env_overrides();

        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> ConfigErrorResult<Self> {
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            toml::from_str(contents).map_err(|e| ConfigError::Toml {
                path: path.to_path_buf(),
                source: e,
            })
        } else {
            serde_json::from_str(contents).map_err(|e| ConfigError::Json {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }

    /// Validate all settings.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.probe_socket_addr()?;

        if self.server_port == 0 {
            return Err(ConfigError::probe("server_port must be > 0"));
        }

        if self.probe_timeout_ms == 0 || self.probe_timeout_ms > MAX_PROBE_TIMEOUT_MS {
            return Err(ConfigError::probe(format!(
                "probe_timeout_ms must be 1-{}, got {}",
                MAX_PROBE_TIMEOUT_MS, self.probe_timeout_ms
            )));
        }

        if self.check_interval == 0 || self.check_interval > MAX_CHECK_INTERVAL_SECS {
            return Err(ConfigError::config(format!(
                "check_interval must be 1-{}, got {}",
                MAX_CHECK_INTERVAL_SECS, self.check_interval
            )));
        }

        if self.max_fails == 0 {
            return Err(ConfigError::config("max_fails must be > 0"));
        }

        if self.auto_restart_hour > MAX_AUTO_RESTART_HOUR {
            return Err(ConfigError::schedule(format!(
                "auto_restart_hour must be 0-{}, got {}",
                MAX_AUTO_RESTART_HOUR, self.auto_restart_hour
            )));
        }

        if self.srcds_path.trim().is_empty() {
            return Err(ConfigError::process("srcds_path must be set"));
        }

        if self.target_process_name().is_empty() {
            return Err(ConfigError::process(
                "process_name is empty and cannot be derived from srcds_path",
            ));
        }

        Ok(())
    }

    /// Name matched against running processes.
    pub fn target_process_name(&self) -> String {
        if let Some(ref name) = self.process_name {
            return name.trim().to_string();
        }

        Path::new(&self.srcds_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn srcds_path(&self) -> PathBuf {
        PathBuf::from(&self.srcds_path)
    }

    /// Probe target as `ip:port`.
    pub fn probe_addr(&self) -> String {
        format!("{}:{}", self.server_ip, self.server_port)
    }

    /// Probe target as a socket address. IPv6 literals are accepted.
    pub fn probe_socket_addr(&self) -> ConfigErrorResult<SocketAddr> {
        let ip: IpAddr = self.server_ip.parse().map_err(|_| {
            ConfigError::probe(format!(
                "server_ip must be an IP address, got '{}'",
                self.server_ip
            ))
        })?;

        Ok(SocketAddr::new(ip, self.server_port))
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn restart_grace(&self) -> Duration {
        Duration::from_secs(self.restart_grace_secs)
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  probe: {} (timeout {}ms)", self.probe_addr(), self.probe_timeout_ms);
        info!(
            "  process: {} [{}] (match name '{}')",
            self.srcds_path,
            self.srcds_args.join(" "),
            self.target_process_name()
        );
        info!(
            "  supervision: every {}s, restart after {} failures, grace {}s",
            self.check_interval, self.max_fails, self.restart_grace_secs
        );
        info!("  schedule: daily restart at {:02}:00", self.auto_restart_hour);
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Probe
        Self::apply_env_string("GP_SERVER_IP", &mut self.server_ip);
        Self::apply_env_parse("GP_SERVER_PORT", &mut self.server_port);
        Self::apply_env_parse("GP_PROBE_TIMEOUT_MS", &mut self.probe_timeout_ms);

        // Process
        Self::apply_env_string("GP_SRCDS_PATH", &mut self.srcds_path);
        Self::apply_env_option_string("GP_PROCESS_NAME", &mut self.process_name);

        // Supervision
        Self::apply_env_parse("GP_CHECK_INTERVAL", &mut self.check_interval);
        Self::apply_env_parse("GP_MAX_FAILS", &mut self.max_fails);
        Self::apply_env_parse("GP_AUTO_RESTART_HOUR", &mut self.auto_restart_hour);
        Self::apply_env_parse("GP_RESTART_GRACE_SECS", &mut self.restart_grace_secs);

        // Logging
        Self::apply_env_parse("GP_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("GP_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("GP_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
