use crate::probe::HealthInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable(HealthInfo),
    /// Timeout, network or protocol error. The cause is only logged.
    Unreachable,
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable(_))
    }
}
