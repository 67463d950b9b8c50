use crate::{WatchdogError, WatchdogResult};

use std::fmt::Arguments;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{Record, info};

/// Initialize the global logger.
///
/// Logs go to `log_file` when set (appended, never colored), to stdout
/// otherwise. `colored` only applies to stdout.
pub fn initialize(
    log_level: gp_config::LogLevel,
    log_file: Option<PathBuf>,
    colored: bool,
) -> WatchdogResult<()> {
    let level_filter = log_level.0;

    let output = match log_file {
        Some(ref path) => Dispatch::new()
            .format(line_format(None))
            .chain(open_log_file(path)?),
        None => Dispatch::new()
            .format(line_format(colored.then(level_colors)))
            .chain(std::io::stdout()),
    };

    Dispatch::new()
        .level(level_filter)
        .chain(output)
        .apply()
        .map_err(|e| WatchdogError::Logger {
            message: format!("Failed to initialize logger: {e}"),
        })?;

    match log_file {
        Some(path) => info!(
            "Logger initialized: level={level_filter:?}, file={}",
            path.display()
        ),
        None => info!("Logger initialized: level={level_filter:?}, stdout"),
    }

    Ok(())
}

/// `[2024-01-15T12:00:00Z - INFO] message`, with the level optionally colored.
fn line_format(
    colors: Option<ColoredLevelConfig>,
) -> impl Fn(FormatCallback<'_>, &Arguments<'_>, &Record<'_>) + Send + Sync + 'static {
    move |out, message, record| {
        let date = humantime::format_rfc3339_seconds(SystemTime::now());
        match &colors {
            Some(colors) => out.finish(format_args!(
                "[{date} - {}] {message}",
                colors.color(record.level())
            )),
            None => out.finish(format_args!("[{date} - {}] {message}", record.level())),
        }
    }
}

fn level_colors() -> ColoredLevelConfig {
    ColoredLevelConfig::new()
        .trace(Color::Magenta)
        .debug(Color::Blue)
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red)
}

pub(crate) fn open_log_file(path: &Path) -> WatchdogResult<File> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir).map_err(|e| WatchdogError::Logger {
            message: format!("Failed to create log directory {}: {e}", dir.display()),
        })?;
    }

    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| WatchdogError::Logger {
            message: format!("Failed to open log file {}: {e}", path.display()),
        })
}
