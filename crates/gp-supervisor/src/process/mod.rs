mod launch_outcome;
mod process_control;
mod process_handle;
mod process_spec;
mod system_process_controller;

pub use launch_outcome::LaunchOutcome;
pub use process_control::ProcessControl;
pub use process_handle::ProcessHandle;
pub use process_spec::ProcessSpec;
pub use system_process_controller::SystemProcessController;

pub(crate) use system_process_controller::is_truncated_name;
