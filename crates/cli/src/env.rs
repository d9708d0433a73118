// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate. State paths
//! themselves are resolved through `ttsbus_daemon::Config` so the CLI and
//! daemon never disagree about where things live; this module covers the
//! handful of knobs that are CLI-only.

use std::path::PathBuf;

/// Override for the `ttsbusd` binary path, used when it isn't a sibling of
/// `ttsbus` on `$PATH` (e.g. running straight out of `target/debug`).
pub fn daemon_binary() -> Option<String> {
    std::env::var("TTSBUS_DAEMON_BINARY").ok()
}

/// Opaque session id override, used by hook scripts that already know their
/// session identity rather than deriving one from the working directory.
pub fn session_id_override() -> Option<String> {
    std::env::var("TTSBUS_SESSION_ID").ok().filter(|s| !s.is_empty())
}

/// Locates the `ttsbusd` binary: an explicit override, then a sibling of the
/// running `ttsbus` binary, then bare-name `$PATH` resolution.
pub fn daemon_binary_path() -> PathBuf {
    if let Some(path) = daemon_binary() {
        return PathBuf::from(path);
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let sibling = dir.join("ttsbusd");
            if sibling.exists() {
                return sibling;
            }
        }
    }
    PathBuf::from("ttsbusd")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
