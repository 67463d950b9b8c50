use std::panic::Location;
use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Server binary not found at {path} {location}")]
    BinaryNotFound {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Failed to spawn {path}: {source} {location}")]
    ProcessSpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to kill process {pid}: {message} {location}")]
    ProcessKill {
        pid: u32,
        message: String,
        location: ErrorLocation,
    },

    #[error("Process {pid} still running {timeout_secs}s after kill {location}")]
    ProcessLingering {
        pid: u32,
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Process scan failed: {message} {location}")]
    ProcessScan {
        message: String,
        location: ErrorLocation,
    },

    #[error("Probe timed out after {timeout_ms}ms {location}")]
    ProbeTimeout {
        timeout_ms: u64,
        location: ErrorLocation,
    },

    #[error("Malformed server reply: {message} {location}")]
    Protocol {
        message: String,
        location: ErrorLocation,
    },

    #[error("Supervisor loop is not running {location}")]
    LoopStopped { location: ErrorLocation },

    #[error("IO error: {source} {location}")]
    Io {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },
}

impl SupervisorError {
    #[track_caller]
    pub fn protocol<S: Into<String>>(message: S) -> Self {
        Self::Protocol {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Whether the next tick may succeed without operator action
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ProbeTimeout { .. }
                | Self::Protocol { .. }
                | Self::Io { .. }
                | Self::ProcessLingering { .. }
                | Self::ProcessScan { .. }
        )
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::BinaryNotFound { .. } => {
                "Check srcds_path in the config file. \
                   The watchdog keeps probing and retries on the next restart."
            }
            Self::ProcessSpawn { .. } => {
                "The server binary could not be started. \
                   Check file permissions and srcds_args."
            }
            Self::ProcessKill { .. } => {
                "The running server could not be killed. \
                   Run the watchdog as the same user that owns the server process."
            }
            Self::ProcessLingering { .. } => {
                "The server did not exit after being killed. \
                   It may be stuck in uninterruptible IO."
            }
            Self::LoopStopped { .. } => "The supervisor stopped. Restart the watchdog.",
            _ => "An unexpected error occurred. Please check the logs for details.",
        }
    }
}

impl From<std::io::Error> for SupervisorError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
