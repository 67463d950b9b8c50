use std::fmt;

/// Why the supervisor restarted the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestartReason {
    /// Consecutive probe failures reached the configured threshold
    FailureThreshold,
    /// Daily restart hour reached
    Scheduled,
    /// Operator request
    Manual,
}

impl fmt::Display for RestartReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FailureThreshold => "failure_threshold",
            Self::Scheduled => "scheduled",
            Self::Manual => "manual",
        };
        f.write_str(label)
    }
}
