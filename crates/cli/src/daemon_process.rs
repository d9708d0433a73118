// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon process management: starting, stopping, and checking the status
//! of `ttsbusd` from the CLI side (§4.7).

use std::process::Command;
use std::time::{Duration, Instant};

use ttsbus_daemon::{process_exists, Config};

use crate::env;

#[derive(Debug, thiserror::Error)]
pub enum DaemonProcessError {
    #[error("failed to spawn {path}: {source}")]
    Spawn {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ttsbus_daemon::ConfigLoadError),
}

/// §4.7's stop-poll budget: the daemon may be finishing a message.
const STOP_POLL_BUDGET: Duration = Duration::from_secs(15);
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Starts `ttsbusd` detached in the background. The daemon double-forks
/// itself (§4.7); this just spawns and waits for the first fork's parent
/// to exit, which happens almost immediately.
pub fn start_daemon_background(lockpick: bool) -> Result<(), DaemonProcessError> {
    let path = env::daemon_binary_path();
    let mut command = Command::new(&path);
    if lockpick {
        command.arg("--lockpick");
    }
    command
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map_err(|source| DaemonProcessError::Spawn { path, source })?;
    Ok(())
}

/// Runs `ttsbusd --foreground`, blocking until it exits (used by
/// `ttsbus daemon start --foreground`).
pub fn run_daemon_foreground(lockpick: bool) -> Result<std::process::ExitStatus, DaemonProcessError> {
    let path = env::daemon_binary_path();
    let mut command = Command::new(&path);
    command.arg("--foreground");
    if lockpick {
        command.arg("--lockpick");
    }
    command.status().map_err(|source| DaemonProcessError::Spawn { path, source })
}

/// Reads the PID the daemon last wrote, if any.
pub fn read_daemon_pid(config: &Config) -> Option<u32> {
    std::fs::read_to_string(&config.pid_path).ok()?.trim().parse().ok()
}

/// Whether a daemon looks alive: a PID file exists and that process
/// responds to a liveness probe.
pub fn is_running(config: &Config) -> bool {
    read_daemon_pid(config).is_some_and(process_exists)
}

/// Sends graceful-terminate, then polls for up to 15s; if still alive, sends
/// kill. Removes the heartbeat and PID files unconditionally once done,
/// mirroring §4.7's "shutdown from CLI" contract.
pub fn stop_daemon_sync(config: &Config) -> bool {
    let Some(pid) = read_daemon_pid(config) else {
        cleanup_stale_files(config);
        return false;
    };
    if !process_exists(pid) {
        cleanup_stale_files(config);
        return false;
    }

    send_signal("-TERM", pid);
    wait_for_exit(pid, STOP_POLL_BUDGET);

    if process_exists(pid) {
        send_signal("-KILL", pid);
        wait_for_exit(pid, STOP_POLL_BUDGET);
    }

    cleanup_stale_files(config);
    true
}

fn wait_for_exit(pid: u32, timeout: Duration) {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if !process_exists(pid) {
            return;
        }
        std::thread::sleep(STOP_POLL_INTERVAL);
    }
}

fn cleanup_stale_files(config: &Config) {
    let _ = std::fs::remove_file(&config.heartbeat_path);
    let _ = std::fs::remove_file(&config.pid_path);
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

#[cfg(test)]
#[path = "daemon_process_tests.rs"]
mod tests;
