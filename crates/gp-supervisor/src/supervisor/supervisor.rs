use crate::probe::{HealthProbe, ProbeOutcome};
use crate::process::{LaunchOutcome, ProcessControl};
use crate::schedule::{Clock, next_deadline};
use crate::supervisor::{
    RestartReason, StatusEvent, SupervisionState, SupervisorCommand, SupervisorConfig,
    SupervisorHandle, SupervisorPhase, SupervisorSnapshot,
};
use crate::SupervisorResult;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use log::{debug, error, info, warn};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};

const EVENT_BUFFER: usize = 64;
const COMMAND_BUFFER: usize = 16;
const MIN_CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Periodic health supervision of a single server process.
///
/// The loop owns all mutable state. Probes, restarts and operator commands
/// run one at a time on the loop task, so a restart can never overlap
/// another restart.
pub struct Supervisor<P, C, K> {
    config: SupervisorConfig,
    probe: P,
    controller: C,
    clock: K,
    state: SupervisionState,
    event_tx: mpsc::Sender<StatusEvent>,
    snapshot_tx: watch::Sender<SupervisorSnapshot>,
    command_rx: mpsc::Receiver<SupervisorCommand>,
}

impl<P, C, K> Supervisor<P, C, K>
where
    P: HealthProbe,
    C: ProcessControl,
    K: Clock,
{
    pub fn new(
        config: SupervisorConfig,
        probe: P,
        controller: C,
        clock: K,
    ) -> (Self, SupervisorHandle, mpsc::Receiver<StatusEvent>) {
        let deadline = next_deadline(&clock.now(), config.restart_hour);
        let state = SupervisionState::new(deadline);

        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot(config.failure_threshold));

        let supervisor = Self {
            config,
            probe,
            controller,
            clock,
            state,
            event_tx,
            snapshot_tx,
            command_rx,
        };

        (
            supervisor,
            SupervisorHandle::new(command_tx, snapshot_rx),
            event_rx,
        )
    }

    pub fn state(&self) -> &SupervisionState {
        &self.state
    }

    /// Make sure a server instance exists before supervision starts.
    ///
    /// Launches one when none is found and waits `startup_settle` so the
    /// first probe does not race the server's own startup. Skipped entirely
    /// in dry-run mode.
    pub async fn ensure_running(&self) -> SupervisorResult<()> {
        if self.config.dry_run {
            info!("[dry-run] Skipping startup check, no server will be launched");
            return Ok(());
        }

        if let Some(handle) = self.controller.locate().await? {
            info!("Server already running: {} (PID {})", handle.name, handle.pid);
            return Ok(());
        }

        info!("Server not running, launching");
        if let LaunchOutcome::Spawned { pid } = self.controller.launch().await? {
            debug!("Waiting {:?} for PID {pid} to settle", self.config.startup_settle);
        }
        tokio::time::sleep(self.config.startup_settle).await;

        Ok(())
    }

    /// Run until the task is dropped or aborted.
    ///
    /// The first tick fires immediately. A tick that overruns the interval
    /// pushes the following ticks back instead of bursting.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.config.check_interval.max(MIN_CHECK_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Supervisor started: probe every {}s, restart after {} failures, daily restart at {:02}:00",
            self.config.check_interval.as_secs(),
            self.config.failure_threshold,
            self.config.restart_hour
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(panic) = AssertUnwindSafe(self.tick()).catch_unwind().await {
                        error!("Supervisor tick panicked: {}", panic_message(panic.as_ref()));
                    }
                }

                Some(command) = self.command_rx.recv() => {
                    if let Err(panic) = AssertUnwindSafe(self.handle_command(command)).catch_unwind().await {
                        error!("Supervisor command panicked: {}", panic_message(panic.as_ref()));
                    }
                }
            }

            self.publish_snapshot();
        }
    }

    /// One supervision cycle: probe (unless in grace), then the schedule.
    ///
    /// When the schedule and the failure threshold fall on the same tick,
    /// a single restart runs with the scheduled reason.
    async fn tick(&mut self) {
        let started = Instant::now();
        self.state
            .set_next_probe_at(Some(started + self.config.check_interval));

        let threshold_reached = if self.state.in_grace(started) {
            debug!("Post-restart grace period, skipping probe");
            self.state.set_phase(SupervisorPhase::Starting);
            false
        } else {
            self.probe_once().await
        };

        let now = self.clock.now();
        let schedule_due = now >= *self.state.restart_deadline();
        if schedule_due {
            let next = next_deadline(&now, self.config.restart_hour);
            info!(
                "Scheduled restart time reached, next one at {}",
                next.format("%Y-%m-%d %H:%M")
            );
            self.state.set_restart_deadline(next);
        }

        if schedule_due {
            self.restart(RestartReason::Scheduled).await;
        } else if threshold_reached {
            self.restart(RestartReason::FailureThreshold).await;
        }
    }

    /// Returns true when this probe pushed the failure count to the threshold.
    async fn probe_once(&mut self) -> bool {
        self.state.set_phase(SupervisorPhase::Probing);
        self.publish_snapshot();

        match self.probe.probe().await {
            ProbeOutcome::Reachable(info) => {
                debug!(
                    "Online: {} on {} ({}) {}ms",
                    info.server_name,
                    info.map_name,
                    info.players_label(),
                    info.ping_ms
                );
                self.state.record_success(info.clone());
                self.emit(StatusEvent::Online(info));
                false
            }
            ProbeOutcome::Unreachable => {
                let failures = self.state.record_failure();
                let threshold = self.config.failure_threshold;
                warn!("No response from server ({failures}/{threshold})");

                if failures >= threshold {
                    true
                } else {
                    self.emit(StatusEvent::Unreachable {
                        consecutive_failures: failures,
                    });
                    false
                }
            }
        }
    }

    async fn handle_command(&mut self, command: SupervisorCommand) {
        match command {
            SupervisorCommand::Restart => self.restart(RestartReason::Manual).await,
        }
    }

    /// Kill and relaunch. Failures are reported, never propagated.
    async fn restart(&mut self, reason: RestartReason) {
        match reason {
            RestartReason::FailureThreshold => warn!(
                "Server unresponsive for {} checks, restarting",
                self.config.failure_threshold
            ),
            RestartReason::Scheduled => info!("Performing scheduled restart"),
            RestartReason::Manual => info!("Manual restart requested"),
        }

        self.state.record_restart();
        self.announce(StatusEvent::RestartTriggered { reason }).await;
        self.publish_snapshot();

        match self.controller.restart().await {
            Ok(LaunchOutcome::Spawned { pid }) => {
                info!("Restart ({reason}) complete, new PID {pid}");
            }
            Ok(LaunchOutcome::DryRun) => {
                info!("[dry-run] Restart ({reason}) finished without launching");
                self.announce(StatusEvent::LaunchSkipped).await;
            }
            Err(e) => {
                if e.is_transient() {
                    warn!("Restart ({reason}) failed, will retry: {e}");
                } else {
                    error!("Restart ({reason}) failed: {e}");
                }
                warn!("{}", e.recovery_hint());
                self.announce(StatusEvent::RestartFailed {
                    reason,
                    message: e.to_string(),
                })
                .await;
            }
        }

        let grace = self.config.restart_grace;
        self.state
            .set_grace_until((!grace.is_zero()).then(|| Instant::now() + grace));
    }

    /// Best effort: probe results are dropped when the buffer is full.
    fn emit(&self, event: StatusEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!("Status event buffer full, dropping {event:?}");
            }
            // Nobody is listening
            Err(TrySendError::Closed(_)) => {}
        }
    }

    /// Restart events wait for buffer space instead of being dropped.
    async fn announce(&self, event: StatusEvent) {
        if self.event_tx.send(event).await.is_err() {
            debug!("No status listener, restart event discarded");
        }
    }

    fn publish_snapshot(&self) {
        self.snapshot_tx
            .send_replace(self.state.snapshot(self.config.failure_threshold));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("non-string panic payload")
    }
}
