use crate::probe::HealthInfo;
use crate::supervisor::RestartReason;

/// Events published by the supervisor loop, at most a few per tick.
///
/// `Online` and `Unreachable` are dropped when the listener falls behind by
/// more than the channel capacity. Restart events are never dropped; the loop
/// waits for the listener instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    Online(HealthInfo),
    Unreachable { consecutive_failures: u32 },
    RestartTriggered { reason: RestartReason },
    /// Kill or launch failed; the loop keeps ticking
    RestartFailed { reason: RestartReason, message: String },
    /// Dry-run mode swallowed a launch
    LaunchSkipped,
}
