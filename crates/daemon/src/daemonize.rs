// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! POSIX daemonization (§4.7): double-fork, new session, `chdir("/")`, zero
//! umask, redirect stdio, PID file, ignore terminal hangup.
//!
//! The CLI's `ttsbus daemon start` does not wait on this process's stdout —
//! after [`daemonize`] forks, the original process exits and only the
//! grandchild continues past this call. The CLI instead polls for the
//! heartbeat file to appear and tails the daemon log for a startup error
//! (see `ttsbus-cli::daemon_process`).

use std::path::Path;

use daemonize::Daemonize;

#[derive(Debug, thiserror::Error)]
pub enum DaemonizeError {
    #[error("failed to open log file for daemonized stdio: {0}")]
    Log(#[from] std::io::Error),
    #[error("daemonize failed: {0}")]
    Fork(#[from] daemonize::Error),
}

/// Forks into a detached background process rooted at `/`, with stdout and
/// stderr redirected to `log_path` (tracing's own file appender reopens the
/// same path after this returns, so early libc-level writes and later
/// `tracing` writes end up in the same file).
///
/// Does not write a PID file itself: `DaemonLock::acquire` does that, after
/// this returns, so a `--lockpick` takeover still reads the *old* daemon's
/// PID out of `pid_path` instead of racing this call's own fork.
///
/// Must be called before any tokio runtime is started — forking a
/// multi-threaded process only carries the calling thread into the child.
pub fn daemonize(log_path: &Path) -> Result<(), DaemonizeError> {
    let stdout = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    let stderr = stdout.try_clone()?;

    Daemonize::new()
        .working_directory("/")
        .umask(0o000)
        .stdout(stdout)
        .stderr(stderr)
        .start()?;

    Ok(())
}
