// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolved filesystem layout for one user-level daemon instance (§6).

use std::path::PathBuf;

use ttsbus_core::PersonaConfig;

use crate::env;

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("could not determine home directory")]
    NoHomeDir,
    #[error(transparent)]
    Config(#[from] ttsbus_core::error::ConfigError),
}

/// Daemon filesystem layout, all paths rooted at [`env::state_dir`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (`~/.ttsbus` by default).
    pub state_dir: PathBuf,
    /// Path to the PID file written after the lock is acquired.
    pub pid_path: PathBuf,
    /// Path to the lock file `fs2` holds an exclusive advisory lock on.
    pub lock_path: PathBuf,
    /// Path to the heartbeat file (§4.2).
    pub heartbeat_path: PathBuf,
    /// Path to the daemon's own log file.
    pub log_path: PathBuf,
    /// Path to the playback state file (§4.3).
    pub playback_path: PathBuf,
    /// Path to the queue directory (§4.1).
    pub queue_dir: PathBuf,
    /// Path to the persona/queue config file (§6).
    pub config_path: PathBuf,
    /// Directory of per-session override files.
    pub sessions_dir: PathBuf,
}

impl Config {
    /// Resolve the fixed path set for the user-level daemon.
    ///
    /// One daemon serves every project for a user; there is no per-project
    /// root the way a workspace-scoped tool would need.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let state_dir = env::state_dir()?;

        Ok(Self {
            pid_path: state_dir.join("daemon.pid"),
            lock_path: state_dir.join("daemon.lock"),
            heartbeat_path: state_dir.join("daemon.heartbeat"),
            log_path: state_dir.join("daemon.log"),
            playback_path: state_dir.join("playback.json"),
            queue_dir: state_dir.join("queue"),
            config_path: state_dir.join("config.json"),
            sessions_dir: state_dir.join("sessions"),
            state_dir,
        })
    }

    /// Loads the persona/queue config, falling back read-only to the legacy
    /// `~/.claude-tts/config.json` location (§9A) if nothing has been
    /// written at [`Config::config_path`] yet. The legacy file is never
    /// written to; a subsequent `ttsbus persona set-default` or similar
    /// mutation writes to `config_path`, completing the one-time migration.
    pub fn load_persona_config(&self) -> Result<PersonaConfig, ConfigLoadError> {
        if self.config_path.exists() {
            return Ok(PersonaConfig::load(&self.config_path)?);
        }
        if let Some(legacy_dir) = env::legacy_config_dir() {
            let legacy_path = legacy_dir.join("config.json");
            if legacy_path.exists() {
                return Ok(PersonaConfig::load(&legacy_path)?);
            }
        }
        Ok(PersonaConfig::default())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
