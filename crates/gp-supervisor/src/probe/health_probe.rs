use crate::probe::ProbeOutcome;

use async_trait::async_trait;

/// One health query against the supervised server.
///
/// Implementations bound the call with their own timeout and must fold every
/// failure into `ProbeOutcome::Unreachable` instead of returning an error.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self) -> ProbeOutcome;
}
