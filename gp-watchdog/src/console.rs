//! Operator input: console commands and process signals.

use crate::{WatchdogError, WatchdogResult};

use std::io::BufRead;

use log::{debug, info, warn};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    Restart,
    Status,
    Quit,
}

impl OperatorCommand {
    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "r" | "restart" => Some(Self::Restart),
            "s" | "status" => Some(Self::Status),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Read commands from stdin on a dedicated thread.
///
/// End of input (a service with stdin closed) stops the reader only; the
/// watchdog keeps running.
pub fn spawn_stdin_reader(tx: mpsc::Sender<OperatorCommand>) {
    let spawned = std::thread::Builder::new()
        .name("console".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }

                match OperatorCommand::parse(&line) {
                    Some(command) => {
                        if tx.blocking_send(command).is_err() {
                            break;
                        }
                    }
                    None => warn!(
                        "Unknown command '{}'. Use r(estart), s(tatus) or q(uit)",
                        line.trim()
                    ),
                }
            }
            debug!("Console input closed");
        });

    if let Err(e) = spawned {
        warn!("Console commands unavailable: {e}");
    }
}

/// Map SIGUSR1 to a restart and SIGINT/SIGTERM to quit.
#[cfg(unix)]
pub fn spawn_signal_listener(tx: mpsc::Sender<OperatorCommand>) -> WatchdogResult<()> {
    use signal_hook::consts::{SIGINT, SIGTERM, SIGUSR1};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM, SIGUSR1]).map_err(|e| WatchdogError::Signal {
            message: format!("Failed to register signal handlers: {e}"),
        })?;

    std::thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            for signal in signals.forever() {
                let command = command_for_signal(signal);
                info!("Received signal {signal}, {command:?}");
                if tx.blocking_send(command).is_err() {
                    break;
                }
            }
        })
        .map_err(|e| WatchdogError::Signal {
            message: format!("Failed to start signal thread: {e}"),
        })?;

    Ok(())
}

#[cfg(not(unix))]
pub fn spawn_signal_listener(tx: mpsc::Sender<OperatorCommand>) -> WatchdogResult<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C");
                let _ = tx.send(OperatorCommand::Quit).await;
            }
            Err(e) => warn!("Failed to listen for Ctrl+C: {e}"),
        }
    });

    Ok(())
}

#[cfg(unix)]
pub fn command_for_signal(signal: i32) -> OperatorCommand {
    if signal == signal_hook::consts::SIGUSR1 {
        OperatorCommand::Restart
    } else {
        OperatorCommand::Quit
    }
}
