use std::time::Duration;

/// Supervision policy, fixed for the lifetime of the loop.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub check_interval: Duration,
    /// Consecutive unreachable probes that trigger a restart (> 0)
    pub failure_threshold: u32,
    /// Local hour of the daily restart (0-23)
    pub restart_hour: u8,
    /// Probes are skipped this long after a restart
    pub restart_grace: Duration,
    /// Wait after a startup launch before the first probe
    pub startup_settle: Duration,
    pub dry_run: bool,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(30),
            failure_threshold: 3,
            restart_hour: 3,
            restart_grace: Duration::from_secs(10),
            startup_settle: crate::STARTUP_SETTLE,
            dry_run: false,
        }
    }
}
