pub mod error;
pub mod probe;
pub mod process;
pub mod schedule;
pub mod supervisor;

#[cfg(test)]
mod tests;

pub use error::{Result as SupervisorResult, SupervisorError};
pub use probe::{A2sProbe, HealthInfo, HealthProbe, ProbeOutcome};
pub use process::{LaunchOutcome, ProcessControl, ProcessHandle, ProcessSpec, SystemProcessController};
pub use schedule::{Clock, SystemClock, format_remaining, next_deadline, remaining};
pub use supervisor::{
    RestartReason, StatusEvent, Supervisor, SupervisorCommand, SupervisorConfig,
    SupervisorHandle, SupervisorPhase, SupervisorSnapshot,
};

/// Delay after a startup launch before the first probe.
pub const STARTUP_SETTLE: std::time::Duration = std::time::Duration::from_secs(2);
