//! Process control backed by an OS-wide process-name scan.

use crate::process::{LaunchOutcome, ProcessControl, ProcessHandle, ProcessSpec};
use crate::{SupervisorError, SupervisorResult};

use std::ffi::OsStr;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use error_location::ErrorLocation;
use log::{debug, info, warn};
use sysinfo::{
    Pid, Process, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System, UpdateKind,
};
use tokio::time::Instant;

const EXIT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Linux truncates a process's `comm` name to this many bytes
const COMM_NAME_LEN: usize = 15;

pub struct SystemProcessController {
    spec: ProcessSpec,
}

impl SystemProcessController {
    pub fn new(spec: ProcessSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &ProcessSpec {
        &self.spec
    }

    /// Scan the process table on the blocking pool.
    async fn scan(&self) -> SupervisorResult<Option<ProcessHandle>> {
        let name = self.spec.process_name.clone();

        tokio::task::spawn_blocking(move || find_by_name(&name))
            .await
            .map_err(|e| SupervisorError::ProcessScan {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    async fn wait_for_exit(&self, pid: u32) -> SupervisorResult<()> {
        let start = Instant::now();

        while start.elapsed() < EXIT_WAIT_TIMEOUT {
            let alive = tokio::task::spawn_blocking(move || is_running(pid))
                .await
                .unwrap_or(false);
            if !alive {
                debug!("Process {pid} exited");
                return Ok(());
            }
            tokio::time::sleep(EXIT_POLL_INTERVAL).await;
        }

        Err(SupervisorError::ProcessLingering {
            pid,
            timeout_secs: EXIT_WAIT_TIMEOUT.as_secs(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

#[async_trait]
impl ProcessControl for SystemProcessController {
    async fn locate(&self) -> SupervisorResult<Option<ProcessHandle>> {
        self.scan().await
    }

    async fn terminate(&self) -> SupervisorResult<Option<ProcessHandle>> {
        let Some(handle) = self.scan().await? else {
            debug!("No '{}' process running, nothing to kill", self.spec.process_name);
            return Ok(None);
        };

        info!("Killing {} (PID {})", handle.name, handle.pid);
        kill_pid(handle.pid)?;
        self.wait_for_exit(handle.pid).await?;

        Ok(Some(handle))
    }

    async fn launch(&self) -> SupervisorResult<LaunchOutcome> {
        let spec = &self.spec;

        if spec.dry_run {
            info!(
                "[dry-run] Would launch {} {}",
                spec.binary.display(),
                spec.args.join(" ")
            );
            return Ok(LaunchOutcome::DryRun);
        }

        let binary = resolve_binary(&spec.binary)?;

        // Bare names are resolved through PATH by spawn
        if is_explicit_path(&binary) && !binary.is_file() {
            return Err(SupervisorError::BinaryNotFound {
                path: binary,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut cmd = tokio::process::Command::new(&binary);
        cmd.args(&spec.args);

        // Source servers resolve game content relative to their own directory
        if let Some(dir) = binary.parent()
            && !dir.as_os_str().is_empty()
        {
            cmd.current_dir(dir);
        }

        // Detach into its own session so the server outlives the watchdog
        #[cfg(unix)]
        {
            unsafe {
                cmd.pre_exec(|| {
                    libc::setsid();
                    Ok(())
                });
            }
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SupervisorError::BinaryNotFound {
                    path: binary.clone(),
                    location: ErrorLocation::from(Location::caller()),
                }
            } else {
                SupervisorError::ProcessSpawn {
                    path: binary.clone(),
                    source: e,
                    location: ErrorLocation::from(Location::caller()),
                }
            }
        })?;

        let pid = child.id().unwrap_or_default();
        info!("Launched {} with PID {pid}", binary.display());

        // Reap the child so a crashed server never lingers as a zombie
        // that the name scan would keep finding.
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => info!("Server process {pid} exited: {status}"),
                Err(e) => warn!("Failed to wait on server process {pid}: {e}"),
            }
        });

        Ok(LaunchOutcome::Spawned { pid })
    }
}

fn is_explicit_path(path: &Path) -> bool {
    path.is_absolute() || path.components().count() > 1
}

/// Anchor a relative `dir/name` path at the watchdog's working directory.
///
/// The child starts inside the binary's directory, so a relative program
/// path would otherwise be looked up a second time from there.
fn resolve_binary(binary: &Path) -> SupervisorResult<PathBuf> {
    if binary.is_absolute() || !is_explicit_path(binary) {
        return Ok(binary.to_path_buf());
    }

    std::path::absolute(binary).map_err(|e| SupervisorError::Io {
        source: e,
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Lowest PID wins when several processes share the name.
fn find_by_name(name: &str) -> Option<ProcessHandle> {
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing()
            .with_exe(UpdateKind::OnlyIfNotSet)
            .with_cmd(UpdateKind::OnlyIfNotSet),
    );

    let target = OsStr::new(name);

    system
        .processes()
        .values()
        .filter(|p| p.status() != ProcessStatus::Zombie && matches_name(p, target))
        .map(|p| ProcessHandle {
            pid: p.pid().as_u32(),
            name: p.name().to_string_lossy().into_owned(),
        })
        .min_by_key(|h| h.pid)
}

/// Compare against the kernel name, then the executable and `argv[0]` file
/// names, which are not truncated.
fn matches_name(process: &Process, target: &OsStr) -> bool {
    let file_name_is_target = |path: &Path| path.file_name() == Some(target);

    process.name() == target
        || process.exe().is_some_and(file_name_is_target)
        || process
            .cmd()
            .first()
            .is_some_and(|arg0| file_name_is_target(Path::new(arg0)))
        || is_truncated_name(process.name(), target)
}

/// True when `name` is the kernel's cut-off form of a longer `target`.
pub(crate) fn is_truncated_name(name: &OsStr, target: &OsStr) -> bool {
    let name = name.as_encoded_bytes();
    let target = target.as_encoded_bytes();

    name.len() == COMM_NAME_LEN && target.len() > COMM_NAME_LEN && target.starts_with(name)
}

fn is_running(pid: u32) -> bool {
    let sys_pid = Pid::from_u32(pid);
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[sys_pid]), true);

    system
        .process(sys_pid)
        .is_some_and(|p| p.status() != ProcessStatus::Zombie)
}

#[cfg(unix)]
fn kill_pid(pid: u32) -> SupervisorResult<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid as NixPid;

    match kill(NixPid::from_raw(pid as i32), Signal::SIGKILL) {
        // Already gone counts as terminated
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(SupervisorError::ProcessKill {
            pid,
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

#[cfg(not(unix))]
fn kill_pid(pid: u32) -> SupervisorResult<()> {
    let sys_pid = Pid::from_u32(pid);
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[sys_pid]), true);

    match system.process(sys_pid) {
        None => Ok(()),
        Some(process) if process.kill() => Ok(()),
        Some(_) => Err(SupervisorError::ProcessKill {
            pid,
            message: "kill request was rejected".into(),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
