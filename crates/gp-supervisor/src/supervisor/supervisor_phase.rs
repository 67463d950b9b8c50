use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorPhase {
    /// Before the first probe, or inside the post-restart grace period
    Starting,
    /// Probe in flight
    Probing,
    Healthy,
    /// Last probe failed, threshold not reached
    Degraded,
    Restarting,
}

impl fmt::Display for SupervisorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Starting => "STARTING",
            Self::Probing => "PROBING",
            Self::Healthy => "ONLINE",
            Self::Degraded => "NO RESPONSE",
            Self::Restarting => "RESTARTING",
        };
        f.write_str(label)
    }
}
