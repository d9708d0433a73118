// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon heartbeat file (§4.2): a one-line float timestamp the CLI
//! reads to decide whether to route a `speak` call through the queue or
//! synthesize directly because the daemon looks dead.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, thiserror::Error)]
pub enum HeartbeatError {
    #[error("failed to read heartbeat at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("heartbeat at {path} is not a valid timestamp")]
    Malformed { path: PathBuf },
    #[error(transparent)]
    Write(#[from] crate::atomic::AtomicWriteError),
}

pub struct Heartbeat {
    path: PathBuf,
}

impl Heartbeat {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn beat(&self, now: SystemTime) -> Result<(), HeartbeatError> {
        let epoch = now
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        crate::atomic::write_atomic(
            &crate::atomic::FsAtomicWriter,
            &self.path,
            format!("{epoch:.6}").as_bytes(),
        )?;
        Ok(())
    }

    /// Seconds since the last heartbeat, or `None` if the file doesn't exist
    /// (daemon never started, or was stopped cleanly and removed its file).
    pub fn age_secs(&self, now: SystemTime) -> Result<Option<f64>, HeartbeatError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(HeartbeatError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let last_beat: f64 = contents
            .trim()
            .parse()
            .map_err(|_| HeartbeatError::Malformed {
                path: self.path.clone(),
            })?;
        let now_epoch = now
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        Ok(Some((now_epoch - last_beat).max(0.0)))
    }

    /// Whether the heartbeat is older than `threshold_secs`, treating a
    /// missing file as stale.
    pub fn is_stale(&self, threshold_secs: f64, now: SystemTime) -> Result<bool, HeartbeatError> {
        Ok(self
            .age_secs(now)?
            .map_or(true, |age| age > threshold_secs))
    }

    pub fn remove(&self) -> Result<(), HeartbeatError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) | Err(_) => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
