/// Result of a launch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// A detached server process was started
    Spawned { pid: u32 },
    /// Dry-run mode: launch intent logged, nothing spawned
    DryRun,
}
