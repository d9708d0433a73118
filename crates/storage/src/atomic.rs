// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The write-temp-then-rename(+fsync) primitive shared by the queue
//! directory, the playback state store, and the heartbeat file.
//!
//! Every state file in `~/.ttsbus` is small (a few hundred bytes of JSON at
//! most), so unlike a WAL/snapshot pair there's no compression step here —
//! just the atomicity guarantee.

use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum AtomicWriteError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_err(path: &Path, source: std::io::Error) -> AtomicWriteError {
    AtomicWriteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Abstracts the filesystem operations behind an atomic write, so callers can
/// substitute a fake in tests without touching a real disk.
pub trait AtomicWriter: Send + Sync + 'static {
    fn write_tmp(&self, path: &Path, data: &[u8]) -> Result<(), AtomicWriteError>;
    fn fsync_file(&self, path: &Path) -> Result<(), AtomicWriteError>;
    fn rename(&self, from: &Path, to: &Path) -> Result<(), AtomicWriteError>;
    fn fsync_dir(&self, path: &Path) -> Result<(), AtomicWriteError>;
}

/// Real filesystem implementation.
#[derive(Clone, Default)]
pub struct FsAtomicWriter;

impl AtomicWriter for FsAtomicWriter {
    fn write_tmp(&self, path: &Path, data: &[u8]) -> Result<(), AtomicWriteError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        let mut file = File::create(path).map_err(|e| io_err(path, e))?;
        file.write_all(data).map_err(|e| io_err(path, e))
    }

    fn fsync_file(&self, path: &Path) -> Result<(), AtomicWriteError> {
        File::open(path)
            .and_then(|f| f.sync_all())
            .map_err(|e| io_err(path, e))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), AtomicWriteError> {
        std::fs::rename(from, to).map_err(|e| io_err(to, e))
    }

    fn fsync_dir(&self, path: &Path) -> Result<(), AtomicWriteError> {
        File::open(path)
            .and_then(|f| f.sync_all())
            .map_err(|e| io_err(path, e))
    }
}

/// Writes `data` to `path` via write-tmp, fsync, rename, fsync-parent-dir.
/// The rename is the linearization point: readers never observe a partial
/// file.
pub fn write_atomic<W: AtomicWriter>(
    writer: &W,
    path: &Path,
    data: &[u8],
) -> Result<(), AtomicWriteError> {
    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    writer.write_tmp(&tmp, data)?;
    writer.fsync_file(&tmp)?;
    writer.rename(&tmp, path)?;
    if let Some(parent) = path.parent() {
        writer.fsync_dir(parent)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
