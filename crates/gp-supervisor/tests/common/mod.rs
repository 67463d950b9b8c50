#![allow(dead_code)]

use gp_supervisor::{
    Clock, HealthInfo, HealthProbe, LaunchOutcome, ProbeOutcome, ProcessControl, ProcessHandle,
    StatusEvent, SupervisorConfig, SupervisorError, SupervisorResult,
};

use std::collections::VecDeque;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone};
use error_location::ErrorLocation;
use tokio::sync::mpsc;
use tokio::time::Instant;

// =========================================================================
// Probe
// =========================================================================

#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Up,
    Down,
    Panic,
}

/// Plays back a fixed script, then repeats `fallback`.
#[derive(Clone)]
pub struct ScriptedProbe {
    script: Arc<Mutex<VecDeque<Reply>>>,
    fallback: Reply,
    calls: Arc<AtomicU32>,
}

impl ScriptedProbe {
    pub fn new(script: &[Reply], fallback: Reply) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.iter().copied().collect())),
            fallback,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthProbe for ScriptedProbe {
    async fn probe(&self) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.script.lock().unwrap().pop_front().unwrap_or(self.fallback);

        match reply {
            Reply::Up => ProbeOutcome::Reachable(health()),
            Reply::Down => ProbeOutcome::Unreachable,
            Reply::Panic => panic!("probe exploded"),
        }
    }
}

pub fn health() -> HealthInfo {
    HealthInfo {
        server_name: "Public #1".to_string(),
        map_name: "de_dust2".to_string(),
        player_count: 10,
        max_players: 24,
        ping_ms: 12,
    }
}

// =========================================================================
// Process controller
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Locate,
    Terminate,
    Launch,
}

/// Records every call. A restart sleeps `restart_delay` between the kill
/// and the launch so tests can act while it is in flight.
#[derive(Clone)]
pub struct FakeController {
    actions: Arc<Mutex<Vec<Action>>>,
    running: Arc<AtomicBool>,
    in_flight: Arc<AtomicU32>,
    max_in_flight: Arc<AtomicU32>,
    restart_delay: Duration,
    fail_launch: bool,
    dry_run: bool,
}

impl FakeController {
    pub fn new() -> Self {
        Self {
            actions: Arc::new(Mutex::new(Vec::new())),
            running: Arc::new(AtomicBool::new(true)),
            in_flight: Arc::new(AtomicU32::new(0)),
            max_in_flight: Arc::new(AtomicU32::new(0)),
            restart_delay: Duration::ZERO,
            fail_launch: false,
            dry_run: false,
        }
    }

    pub fn not_running(self) -> Self {
        self.running.store(false, Ordering::SeqCst);
        self
    }

    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }

    pub fn count(&self, action: Action) -> usize {
        self.actions().iter().filter(|a| **a == action).count()
    }

    pub fn max_in_flight(&self) -> u32 {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, action: Action) {
        self.actions.lock().unwrap().push(action);
    }
}

#[async_trait]
impl ProcessControl for FakeController {
    async fn locate(&self) -> SupervisorResult<Option<ProcessHandle>> {
        self.record(Action::Locate);
        Ok(self.running.load(Ordering::SeqCst).then(|| ProcessHandle {
            pid: 4242,
            name: "srcds_linux".to_string(),
        }))
    }

    async fn terminate(&self) -> SupervisorResult<Option<ProcessHandle>> {
        self.record(Action::Terminate);
        let was_running = self.running.swap(false, Ordering::SeqCst);
        Ok(was_running.then(|| ProcessHandle {
            pid: 4242,
            name: "srcds_linux".to_string(),
        }))
    }

    async fn launch(&self) -> SupervisorResult<LaunchOutcome> {
        self.record(Action::Launch);
        if self.dry_run {
            return Ok(LaunchOutcome::DryRun);
        }

        if self.fail_launch {
            return Err(SupervisorError::BinaryNotFound {
                path: PathBuf::from("/opt/srcds/srcds_linux"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.running.store(true, Ordering::SeqCst);
        Ok(LaunchOutcome::Spawned { pid: 4243 })
    }

    async fn restart(&self) -> SupervisorResult<LaunchOutcome> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = async {
            self.terminate().await?;
            tokio::time::sleep(self.restart_delay).await;
            self.launch().await
        }
        .await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

// =========================================================================
// Clock
// =========================================================================

/// Wall clock that follows tokio's (paused) time from a fixed start.
pub struct ManualClock {
    base: DateTime<Local>,
    origin: Instant,
}

impl ManualClock {
    pub fn starting_at(base: DateTime<Local>) -> Self {
        Self {
            base,
            origin: Instant::now(),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.base + TimeDelta::from_std(self.origin.elapsed()).unwrap()
    }
}

/// A January date, far from any DST transition.
pub fn local(hour: u32, minute: u32, second: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 1, 15, hour, minute, second)
        .earliest()
        .unwrap()
}

// =========================================================================
// Helpers
// =========================================================================

pub fn fast_config() -> SupervisorConfig {
    SupervisorConfig {
        check_interval: Duration::from_secs(1),
        failure_threshold: 3,
        restart_hour: 3,
        restart_grace: Duration::ZERO,
        startup_settle: Duration::ZERO,
        dry_run: false,
    }
}

pub async fn next_events(rx: &mut mpsc::Receiver<StatusEvent>, count: usize) -> Vec<StatusEvent> {
    let mut events = Vec::with_capacity(count);
    while events.len() < count {
        let event = tokio::time::timeout(Duration::from_secs(3600), rx.recv())
            .await
            .expect("timed out waiting for a status event")
            .expect("event channel closed");
        events.push(event);
    }
    events
}

/// Skip events until one matches, returning it.
pub async fn wait_for(
    rx: &mut mpsc::Receiver<StatusEvent>,
    matches: impl Fn(&StatusEvent) -> bool,
) -> StatusEvent {
    loop {
        let event = next_events(rx, 1).await.remove(0);
        if matches(&event) {
            return event;
        }
    }
}
