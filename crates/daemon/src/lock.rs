// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon singleton lock (§4.2): a non-blocking exclusive whole-file
//! lock, with an administrative lockpick override that takes over from a
//! crashed daemon that never released its lock.

use std::fs::File;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use fs2::FileExt;

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("daemon already running (pid file: {0})")]
    AlreadyRunning(PathBuf),
    #[error("lockpick failed: daemon at pid {pid} did not release the lock within {waited:?}")]
    LockpickFailed { pid: u32, waited: Duration },
    #[error("failed to open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write pid file {path}: {source}")]
    WritePid {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

const LOCKPICK_WAIT: Duration = Duration::from_secs(1);
const LOCKPICK_POLL: Duration = Duration::from_millis(50);

/// Holds the daemon's singleton lock; releasing it (drop, or process exit,
/// including a crash) is handled by the OS.
pub struct DaemonLock {
    file: File,
}

impl DaemonLock {
    /// Acquires the singleton lock at `lock_path`, writing `pid_path` with
    /// the current process id once held.
    ///
    /// If `lockpick` is true and the lock is currently held, sends a
    /// graceful-terminate signal to the PID recorded in `pid_path`, waits up
    /// to one second, and retries once before giving up.
    pub fn acquire(
        lock_path: &Path,
        pid_path: &Path,
        lockpick: bool,
    ) -> Result<Self, LockError> {
        if let Some(parent) = lock_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .map_err(|source| LockError::Open {
                path: lock_path.to_path_buf(),
                source,
            })?;

        if file.try_lock_exclusive().is_err() {
            if !lockpick {
                return Err(LockError::AlreadyRunning(pid_path.to_path_buf()));
            }
            Self::lockpick(pid_path)?;
            file.try_lock_exclusive()
                .map_err(|_| LockError::AlreadyRunning(pid_path.to_path_buf()))?;
        }

        let mut pid_file = std::fs::File::create(pid_path).map_err(|source| LockError::WritePid {
            path: pid_path.to_path_buf(),
            source,
        })?;
        writeln!(pid_file, "{}", std::process::id()).map_err(|source| LockError::WritePid {
            path: pid_path.to_path_buf(),
            source,
        })?;

        Ok(Self { file })
    }

    /// Sends graceful-terminate to the PID in `pid_path` and waits up to one
    /// second for the process to exit, polling every 50ms.
    fn lockpick(pid_path: &Path) -> Result<(), LockError> {
        let Some(pid) = read_pid(pid_path) else {
            // No PID on record; the lock is held by something we can't
            // identify. Let the caller's retried try_lock_exclusive fail
            // with AlreadyRunning rather than guessing at a target.
            return Ok(());
        };

        send_signal("-TERM", pid);

        let start = Instant::now();
        while start.elapsed() < LOCKPICK_WAIT {
            if !process_exists(pid) {
                return Ok(());
            }
            std::thread::sleep(LOCKPICK_POLL);
        }

        if process_exists(pid) {
            return Err(LockError::LockpickFailed {
                pid,
                waited: LOCKPICK_WAIT,
            });
        }
        Ok(())
    }
}

/// Reads the PID recorded in `path`, if any.
fn read_pid(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

fn send_signal(signal: &str, pid: u32) -> bool {
    Command::new("kill")
        .args([signal, &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Checks liveness by sending signal 0, which fails harmlessly if the
/// process is gone.
pub fn process_exists(pid: u32) -> bool {
    send_signal("-0", pid)
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
