use crate::console::{self, OperatorCommand};
use crate::presenter;
use crate::WatchdogResult;

use gp_config::Config;
use gp_supervisor::{
    A2sProbe, ProcessSpec, STARTUP_SETTLE, Supervisor, SupervisorConfig, SupervisorHandle,
    SystemClock, SystemProcessController,
};

use std::io::IsTerminal;
use std::time::Duration;

use chrono::Local;
use log::{error, info, warn};
use tokio::sync::mpsc;
use tokio::time::Instant;

const OPERATOR_BUFFER: usize = 8;
const CLOCK_REFRESH: Duration = Duration::from_secs(1);

pub fn supervisor_config(config: &Config, dry_run: bool) -> SupervisorConfig {
    SupervisorConfig {
        check_interval: config.check_interval(),
        failure_threshold: config.max_fails,
        restart_hour: config.auto_restart_hour,
        restart_grace: config.restart_grace(),
        startup_settle: STARTUP_SETTLE,
        dry_run,
    }
}

pub fn process_spec(config: &Config, dry_run: bool) -> ProcessSpec {
    ProcessSpec {
        binary: config.srcds_path(),
        args: config.srcds_args.clone(),
        process_name: config.target_process_name(),
        dry_run,
    }
}

/// Supervise until the operator quits or a shutdown signal arrives.
///
/// The server process is left running on exit.
pub async fn run(config: &Config, dry_run: bool) -> WatchdogResult<()> {
    let probe = A2sProbe::new(config.probe_socket_addr()?, config.probe_timeout());
    let controller = SystemProcessController::new(process_spec(config, dry_run));
    let settings = supervisor_config(config, dry_run);
    let failure_threshold = settings.failure_threshold;

    let (supervisor, handle, mut events) =
        Supervisor::new(settings, probe, controller, SystemClock);

    if let Err(e) = supervisor.ensure_running().await {
        error!("Startup launch failed: {e}");
        warn!("{}", e.recovery_hint());
    }

    let (operator_tx, mut operator_rx) = mpsc::channel(OPERATOR_BUFFER);
    console::spawn_stdin_reader(operator_tx.clone());
    if let Err(e) = console::spawn_signal_listener(operator_tx) {
        warn!("{e}");
    }

    let mut loop_task = tokio::spawn(supervisor.run());
    let mut clock = tokio::time::interval(CLOCK_REFRESH);
    let show_clock = std::io::stdout().is_terminal();

    info!("Watchdog running. Commands: r(estart), s(tatus), q(uit)");

    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                presenter::report_event(&event, failure_threshold);
            }

            Some(command) = operator_rx.recv() => {
                if !handle_command(command, &handle).await {
                    break;
                }
            }

            _ = clock.tick(), if show_clock => {
                let line = presenter::clock_line(&Local::now(), &handle.snapshot(), Instant::now());
                presenter::render_title(&line);
            }

            result = &mut loop_task => {
                match result {
                    Ok(()) => error!("Supervisor loop exited unexpectedly"),
                    Err(e) => error!("Supervisor loop crashed: {e}"),
                }
                break;
            }
        }
    }

    loop_task.abort();
    info!("Watchdog stopped, server process left running");

    Ok(())
}

/// Returns false when the watchdog should stop.
async fn handle_command(command: OperatorCommand, handle: &SupervisorHandle) -> bool {
    match command {
        OperatorCommand::Restart => {
            info!("Restart requested by operator");
            if let Err(e) = handle.request_restart().await {
                error!("{e}");
                return false;
            }
        }
        OperatorCommand::Status => {
            for line in presenter::status_report(&Local::now(), &handle.snapshot()) {
                info!("{line}");
            }
        }
        OperatorCommand::Quit => {
            info!("Shutting down");
            return false;
        }
    }

    true
}
