use crate::supervisor::{SupervisorCommand, SupervisorSnapshot};
use crate::{SupervisorError, SupervisorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};

/// Foreground side of the supervisor: commands in, snapshots out.
#[derive(Clone)]
pub struct SupervisorHandle {
    command_tx: mpsc::Sender<SupervisorCommand>,
    snapshot_rx: watch::Receiver<SupervisorSnapshot>,
}

impl SupervisorHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<SupervisorCommand>,
        snapshot_rx: watch::Receiver<SupervisorSnapshot>,
    ) -> Self {
        Self {
            command_tx,
            snapshot_rx,
        }
    }

    /// Queue an operator restart.
    ///
    /// Returns once the request is queued. It runs as soon as the loop is
    /// idle, after any restart already in flight.
    pub async fn request_restart(&self) -> SupervisorResult<()> {
        self.command_tx
            .send(SupervisorCommand::Restart)
            .await
            .map_err(|_| SupervisorError::LoopStopped {
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SupervisorSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Get current state.
    pub fn snapshot(&self) -> SupervisorSnapshot {
        self.snapshot_rx.borrow().clone()
    }
}
