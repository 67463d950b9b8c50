mod a2s;
mod a2s_probe;
mod health_info;
mod health_probe;
mod probe_outcome;

pub use a2s::{InfoReply, ServerInfo, decode_info_reply, encode_info_request};
pub use a2s_probe::A2sProbe;
pub use health_info::HealthInfo;
pub use health_probe::HealthProbe;
pub use probe_outcome::ProbeOutcome;
