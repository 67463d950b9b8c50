use crate::probe::HealthInfo;
use crate::supervisor::SupervisorPhase;

use chrono::{DateTime, Local};
use tokio::time::Instant;

/// Read-only view of the loop state for live displays.
#[derive(Debug, Clone)]
pub struct SupervisorSnapshot {
    pub phase: SupervisorPhase,
    pub consecutive_failures: u32,
    pub failure_threshold: u32,
    pub next_probe_at: Option<Instant>,
    pub restart_deadline: DateTime<Local>,
    pub last_health: Option<HealthInfo>,
    pub restart_count: u32,
}

impl SupervisorSnapshot {
    /// Whole seconds until the next probe, rounded up.
    pub fn secs_until_next_probe(&self, now: Instant) -> Option<u64> {
        self.next_probe_at.map(|at| {
            let left = at.saturating_duration_since(now);
            left.as_secs() + u64::from(left.subsec_nanos() > 0)
        })
    }
}
