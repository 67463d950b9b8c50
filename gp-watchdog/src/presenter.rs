//! Console rendering of supervisor events and snapshots.

use gp_supervisor::{
    StatusEvent, SupervisorPhase, SupervisorSnapshot, format_remaining, remaining,
};

use std::io::Write;

use chrono::{DateTime, Local};
use log::{error, info, warn};
use tokio::time::Instant;

pub fn event_line(event: &StatusEvent, failure_threshold: u32) -> String {
    match event {
        StatusEvent::Online(info) => format!(
            "ONLINE | {} | {} | Players {} | Ping {}ms",
            info.server_name,
            info.map_name,
            info.players_label(),
            info.ping_ms
        ),
        StatusEvent::Unreachable {
            consecutive_failures,
        } => format!("NO RESPONSE | Attempts: {consecutive_failures}/{failure_threshold}"),
        StatusEvent::RestartTriggered { reason } => format!("RESTARTING | Reason: {reason}"),
        StatusEvent::RestartFailed { reason, message } => {
            format!("RESTART FAILED | Reason: {reason} | {message}")
        }
        StatusEvent::LaunchSkipped => String::from("[dry-run] Launch skipped"),
    }
}

pub fn report_event(event: &StatusEvent, failure_threshold: u32) {
    let line = event_line(event, failure_threshold);
    match event {
        StatusEvent::Online(_) | StatusEvent::LaunchSkipped => info!("{line}"),
        StatusEvent::Unreachable { .. } | StatusEvent::RestartTriggered { .. } => warn!("{line}"),
        StatusEvent::RestartFailed { .. } => error!("{line}"),
    }
}

/// One-line live view: current time, restart countdown and, while the
/// server is not answering, the retry countdown.
pub fn clock_line(now: &DateTime<Local>, snapshot: &SupervisorSnapshot, tick_now: Instant) -> String {
    let mut line = format!(
        "{} | {} | Auto-restart in {}",
        now.format("%H:%M:%S"),
        snapshot.phase,
        format_remaining(remaining(now, &snapshot.restart_deadline))
    );

    if snapshot.phase == SupervisorPhase::Degraded
        && let Some(secs) = snapshot.secs_until_next_probe(tick_now)
    {
        line.push_str(&format!(
            " | Attempts: {} | Next in {secs}s",
            snapshot.consecutive_failures
        ));
    }

    line
}

pub fn status_report(now: &DateTime<Local>, snapshot: &SupervisorSnapshot) -> Vec<String> {
    let mut lines = vec![
        format!("Status: {}", snapshot.phase),
        format!(
            "Failures: {}/{}",
            snapshot.consecutive_failures, snapshot.failure_threshold
        ),
        format!("Restarts this session: {}", snapshot.restart_count),
        format!(
            "Next auto-restart: {} (in {})",
            snapshot.restart_deadline.format("%Y-%m-%d %H:%M"),
            format_remaining(remaining(now, &snapshot.restart_deadline))
        ),
    ];

    if let Some(ref health) = snapshot.last_health {
        lines.push(format!(
            "Server: {} | Map: {} | Players: {} | Ping: {}ms",
            health.server_name,
            health.map_name,
            health.players_label(),
            health.ping_ms
        ));
    }

    lines
}

/// Show the live view in the terminal title so it never interleaves with
/// log lines.
pub fn render_title(line: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = write!(stdout, "\x1b]0;GPanel | {line}\x07");
    let _ = stdout.flush();
}
