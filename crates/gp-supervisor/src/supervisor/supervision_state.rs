use crate::probe::HealthInfo;
use crate::supervisor::{SupervisorPhase, SupervisorSnapshot};

use chrono::{DateTime, Local};
use tokio::time::Instant;

/// Mutable loop state. Owned by the supervisor task and never shared;
/// the outside world only sees `SupervisorSnapshot` copies.
#[derive(Debug, Clone)]
pub struct SupervisionState {
    consecutive_failures: u32,
    phase: SupervisorPhase,
    next_probe_at: Option<Instant>,
    restart_deadline: DateTime<Local>,
    grace_until: Option<Instant>,
    last_health: Option<HealthInfo>,
    restart_count: u32,
}

impl SupervisionState {
    pub fn new(restart_deadline: DateTime<Local>) -> Self {
        Self {
            consecutive_failures: 0,
            phase: SupervisorPhase::Starting,
            next_probe_at: None,
            restart_deadline,
            grace_until: None,
            last_health: None,
            restart_count: 0,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn phase(&self) -> SupervisorPhase {
        self.phase
    }

    pub fn restart_deadline(&self) -> &DateTime<Local> {
        &self.restart_deadline
    }

    pub fn restart_count(&self) -> u32 {
        self.restart_count
    }

    pub fn record_success(&mut self, info: HealthInfo) {
        self.consecutive_failures = 0;
        self.phase = SupervisorPhase::Healthy;
        self.last_health = Some(info);
    }

    /// Returns the updated failure count.
    pub fn record_failure(&mut self) -> u32 {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.phase = SupervisorPhase::Degraded;
        self.last_health = None;
        self.consecutive_failures
    }

    pub fn record_restart(&mut self) {
        self.consecutive_failures = 0;
        self.phase = SupervisorPhase::Restarting;
        self.last_health = None;
        self.restart_count = self.restart_count.saturating_add(1);
    }

    pub fn set_phase(&mut self, phase: SupervisorPhase) {
        self.phase = phase;
    }

    pub fn set_next_probe_at(&mut self, at: Option<Instant>) {
        self.next_probe_at = at;
    }

    pub fn set_restart_deadline(&mut self, deadline: DateTime<Local>) {
        self.restart_deadline = deadline;
    }

    pub fn set_grace_until(&mut self, until: Option<Instant>) {
        self.grace_until = until;
    }

    pub fn in_grace(&self, now: Instant) -> bool {
        self.grace_until.is_some_and(|until| now < until)
    }

    pub fn snapshot(&self, failure_threshold: u32) -> SupervisorSnapshot {
        SupervisorSnapshot {
            phase: self.phase,
            consecutive_failures: self.consecutive_failures,
            failure_threshold,
            next_probe_at: self.next_probe_at,
            restart_deadline: self.restart_deadline,
            last_health: self.last_health.clone(),
            restart_count: self.restart_count,
        }
    }
}
