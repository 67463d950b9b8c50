mod restart_reason;
mod status_event;
mod supervision_state;
mod supervisor;
mod supervisor_command;
mod supervisor_config;
mod supervisor_handle;
mod supervisor_phase;
mod supervisor_snapshot;

pub use restart_reason::RestartReason;
pub use status_event::StatusEvent;
pub use supervision_state::SupervisionState;
pub use supervisor::Supervisor;
pub use supervisor_command::SupervisorCommand;
pub use supervisor_config::SupervisorConfig;
pub use supervisor_handle::SupervisorHandle;
pub use supervisor_phase::SupervisorPhase;
pub use supervisor_snapshot::SupervisorSnapshot;
