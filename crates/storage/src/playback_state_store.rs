// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-modify-write access to `<state_dir>/playback_state.json` (§4.3).
//! Every read opens the file fresh — no in-process cache — so a CLI `pause`
//! command and the daemon's scheduler tick always agree on current state.

use std::path::{Path, PathBuf};

use ttsbus_core::playback_state::{PlaybackState, PlaybackStateUpdate};

#[derive(Debug, thiserror::Error)]
pub enum PlaybackStateError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed playback state at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Write(#[from] crate::atomic::AtomicWriteError),
}

pub struct PlaybackStateStore {
    path: PathBuf,
}

impl PlaybackStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the default (unpaused, no replay) state if the file does not
    /// exist yet.
    pub fn read(&self) -> Result<PlaybackState, PlaybackStateError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| PlaybackStateError::Parse {
                    path: self.path.clone(),
                    source,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PlaybackState::default()),
            Err(source) => Err(PlaybackStateError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Applies `update` to the current on-disk state and writes the result
    /// back atomically.
    pub fn apply(&self, update: PlaybackStateUpdate) -> Result<PlaybackState, PlaybackStateError> {
        let mut state = self.read()?;
        state.apply(update);
        let json = serde_json::to_vec(&state).map_err(|source| PlaybackStateError::Parse {
            path: self.path.clone(),
            source,
        })?;
        crate::atomic::write_atomic(&crate::atomic::FsAtomicWriter, &self.path, &json)?;
        Ok(state)
    }
}

#[cfg(test)]
#[path = "playback_state_store_tests.rs"]
mod tests;
