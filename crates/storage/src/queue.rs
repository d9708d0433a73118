// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The queue directory (§4.1): one JSON file per pending message, named
//! `<timestamp:.6>_<id>.json` so directory listing order is also arrival
//! order. Corrupt entries are tolerated the way a WAL tolerates a torn
//! write: warn, drop the one bad file, keep going.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

use ttsbus_core::id::IdGen;
use ttsbus_core::message::Message;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error(transparent)]
    Write(#[from] crate::atomic::AtomicWriteError),
    #[error("failed to read queue directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One message on disk, paired with the file it lives in.
pub struct QueueEntry {
    pub path: PathBuf,
    pub message: Message,
}

pub struct QueueDirectory {
    dir: PathBuf,
}

impl QueueDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Writes `message` as a new queue file, returning the path written.
    pub fn enqueue(&self, message: &Message, ids: &dyn IdGen) -> Result<PathBuf, QueueError> {
        let ts = message.timestamp();
        let id = ids.next();
        let filename = format!("{ts:.6}_{id}.json");
        let path = self.dir.join(filename);
        let json = serde_json::to_vec(message).unwrap_or_default();
        crate::atomic::write_atomic(&crate::atomic::FsAtomicWriter, &path, &json)?;
        Ok(path)
    }

    /// Lists all queued messages in arrival order, dropping (and logging)
    /// any file that fails to parse as a [`Message`].
    pub fn list(&self) -> Result<Vec<QueueEntry>, QueueError> {
        let read_dir = match std::fs::read_dir(&self.dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(QueueError::ReadDir {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut paths: Vec<PathBuf> = read_dir
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            match std::fs::read(&path).and_then(|bytes| {
                serde_json::from_slice::<Message>(&bytes).map_err(std::io::Error::other)
            }) {
                Ok(message) => entries.push(QueueEntry { path, message }),
                Err(error) => {
                    warn!(path = %path.display(), %error, "corrupt queue entry, dropping");
                    let _ = std::fs::remove_file(&path);
                }
            }
        }
        Ok(entries)
    }

    pub fn delete(&self, path: &Path) -> Result<(), QueueError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(QueueError::ReadDir {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Deletes every queued entry older than `max_age_secs` relative to
    /// `now`, returning how many were evicted.
    pub fn evict_stale(&self, max_age_secs: u64, now: SystemTime) -> Result<usize, QueueError> {
        let now_epoch = now
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        let mut evicted = 0;
        for entry in self.list()? {
            let age = now_epoch - entry.message.timestamp();
            if age > max_age_secs as f64 {
                self.delete(&entry.path)?;
                evicted += 1;
            }
        }
        Ok(evicted)
    }

    /// Drops the oldest entries until at most `max_depth` remain (drop-head
    /// on overflow, per §4.5).
    pub fn enforce_depth(&self, max_depth: usize) -> Result<usize, QueueError> {
        let entries = self.list()?;
        if entries.len() <= max_depth {
            return Ok(0);
        }
        let overflow = entries.len() - max_depth;
        for entry in entries.into_iter().take(overflow) {
            self.delete(&entry.path)?;
        }
        Ok(overflow)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
