use crate::process::{LaunchOutcome, ProcessHandle};
use crate::SupervisorResult;

use async_trait::async_trait;

/// Lifecycle control of the supervised server process.
///
/// The supervisor only talks to this trait, so name-scan tracking can be
/// swapped for another strategy without touching the loop.
#[async_trait]
pub trait ProcessControl: Send + Sync {
    /// First running process matching the target name. No side effects.
    async fn locate(&self) -> SupervisorResult<Option<ProcessHandle>>;

    /// Kill the located process. Returns the killed handle, or None when
    /// nothing was running (not an error).
    async fn terminate(&self) -> SupervisorResult<Option<ProcessHandle>>;

    /// Start a fresh instance without waiting for readiness.
    async fn launch(&self) -> SupervisorResult<LaunchOutcome>;

    /// `terminate()` then `launch()`.
    async fn restart(&self) -> SupervisorResult<LaunchOutcome> {
        self.terminate().await?;
        self.launch().await
    }
}
