// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

use crate::config::ConfigLoadError;

/// Resolve state directory: `TTSBUS_STATE_DIR` > `XDG_STATE_HOME/ttsbus` > `~/.ttsbus`.
///
/// `~/.ttsbus` (rather than the XDG-conventional `~/.local/state/ttsbus`) is
/// the resolved default per §9A: this implementation is not tied to one AI
/// CLI brand and a short, visible dotdir is friendlier for a tool users are
/// expected to inspect directly (`ttsbus persona list`, tailing the log).
pub fn state_dir() -> Result<PathBuf, ConfigLoadError> {
    if let Ok(dir) = std::env::var("TTSBUS_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("ttsbus"));
    }
    let home = dirs::home_dir().ok_or(ConfigLoadError::NoHomeDir)?;
    Ok(home.join(".ttsbus"))
}

/// Read-only legacy config directory consulted for migration only (§9A,
/// `original_source`'s `LEGACY_CONFIG_DIR`). Never written.
pub fn legacy_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".claude-tts"))
}

/// Path to the `piper` synthesis binary, overridable via `TTSBUS_PIPER_PATH`.
/// Defaults to the bare name, resolved against `$PATH` the same way any
/// other subprocess invocation is.
pub fn piper_path() -> PathBuf {
    std::env::var("TTSBUS_PIPER_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("piper"))
}

/// Directory Piper voice models live in, overridable via `TTSBUS_VOICES_DIR`.
/// Defaults to `~/.local/share/piper-voices`, per `original_source`'s
/// `Config.voices_dir`.
pub fn voices_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TTSBUS_VOICES_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".local/share/piper-voices"))
        .unwrap_or_else(|| PathBuf::from(".local/share/piper-voices"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
