// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-modify-write access to `<state_dir>/sessions/<session_id>.json`
//! (§3/§6), one small JSON file per session holding its mute/persona/speed
//! overrides. Same read-fresh-every-time shape as [`crate::playback_state_store`].

use std::path::{Path, PathBuf};

use ttsbus_core::session::SessionOverride;

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed session override at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Write(#[from] crate::atomic::AtomicWriteError),
}

/// Session overrides live one-file-per-session under `sessions_dir`, keyed by
/// session id. Unlike the queue, there is no eviction here: a stray file for
/// a session that never comes back is harmless (a few hundred bytes) and the
/// spec names no cleanup pass for it.
pub struct SessionStore {
    sessions_dir: PathBuf,
}

impl SessionStore {
    pub fn new(sessions_dir: impl Into<PathBuf>) -> Self {
        Self { sessions_dir: sessions_dir.into() }
    }

    fn path_for(&self, session_id: &str) -> PathBuf {
        self.sessions_dir.join(format!("{session_id}.json"))
    }

    /// Returns the default (unmuted-by-override, no persona/speed override)
    /// record if no file exists yet for this session.
    pub fn read(&self, session_id: &str) -> Result<SessionOverride, SessionStoreError> {
        let path = self.path_for(session_id);
        match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|source| SessionStoreError::Parse { path, source }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionOverride::default()),
            Err(source) => Err(SessionStoreError::Read { path, source }),
        }
    }

    /// Applies `mutate` to the current on-disk record and writes the result
    /// back atomically.
    pub fn update(
        &self,
        session_id: &str,
        mutate: impl FnOnce(&mut SessionOverride),
    ) -> Result<SessionOverride, SessionStoreError> {
        let mut overrides = self.read(session_id)?;
        mutate(&mut overrides);
        let path = self.path_for(session_id);
        let json = serde_json::to_vec(&overrides)
            .map_err(|source| SessionStoreError::Parse { path: path.clone(), source })?;
        crate::atomic::write_atomic(&crate::atomic::FsAtomicWriter, &path, &json)?;
        Ok(overrides)
    }

    pub fn path(&self) -> &Path {
        &self.sessions_dir
    }
}

#[cfg(test)]
#[path = "session_store_tests.rs"]
mod tests;
