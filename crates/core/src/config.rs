// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persisted persona/queue configuration (`~/.ttsbus/config.json`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::persona::Persona;

/// How the scheduler signals a change of speaker before playing a message
/// from a different session/project than the one it just played (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerTransition {
    /// Play a short system chime before the message.
    #[default]
    Chime,
    /// Synthesize and play "`<project>` says:" before the message.
    Announce,
    /// No transition cue.
    None,
}

/// Queue-behavior knobs (§4.1/§4.5): depth/age bounds, the speaker-transition
/// cue, the coalescing toggle, and the scheduler's idle-poll period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum number of queued messages; on overflow the oldest are dropped
    /// first (drop-head).
    pub max_depth: usize,
    /// Maximum age, in seconds, a queued message may reach before it is
    /// evicted unplayed.
    pub max_age_seconds: u64,
    pub speaker_transition: SpeakerTransition,
    /// Window, in milliseconds, within which same-session messages may be
    /// coalesced. Accepted and round-tripped; the scheduler does not
    /// currently implement coalescing (§9A).
    pub coalesce_rapid_ms: u64,
    /// Scheduler loop idle-poll period, in milliseconds.
    pub idle_poll_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_depth: 20,
            max_age_seconds: 300,
            speaker_transition: SpeakerTransition::default(),
            coalesce_rapid_ms: 500,
            idle_poll_ms: 100,
        }
    }
}

/// Top-level persisted configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    /// Persona used when nothing more specific resolves one.
    pub active_persona: String,
    /// Whether newly-seen sessions start muted.
    pub default_muted: bool,
    /// Messages longer than this are truncated (with a trailing `...`) before
    /// synthesis.
    pub max_chars: usize,
    /// Registered personas, keyed by name.
    pub personas: IndexMap<String, Persona>,
    /// Project path (as registered via `ttsbus persona set-default --project`)
    /// to persona name, consulted above `active_persona` in the resolution
    /// order but below an explicit session persona.
    pub project_personas: IndexMap<String, String>,
    pub queue: QueueConfig,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        let mut personas = IndexMap::new();
        personas.insert(
            "default".to_string(),
            Persona {
                name: "default".into(),
                voice: "en_US-amy-medium.onnx".into(),
                speed: 1.0,
                speed_method: crate::persona::SpeedMethod::default(),
                speaker: None,
                length_scale: None,
                playback_boost: None,
            },
        );
        Self {
            active_persona: "default".into(),
            default_muted: true,
            max_chars: 10_000,
            personas,
            project_personas: IndexMap::new(),
            queue: QueueConfig::default(),
        }
    }
}

impl PersonaConfig {
    /// Loads config from `path`, or returns the default config if the file
    /// does not exist yet.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Writes config to `path` via the atomic write-temp-then-rename pattern
    /// used throughout the state directory (see `ttsbus_storage::atomic`).
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| ConfigError::Write {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, path).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn persona(&self, name: &str) -> Result<&Persona, ConfigError> {
        self.personas
            .get(name)
            .ok_or_else(|| ConfigError::UnknownPersona(name.to_string()))
    }

    /// The persona registered as the default for `project_dir`, if any.
    pub fn project_persona(&self, project_dir: &str) -> Option<&Persona> {
        self.project_personas
            .get(project_dir)
            .and_then(|name| self.personas.get(name))
    }

    pub fn active_persona(&self) -> Result<&Persona, ConfigError> {
        self.persona(&self.active_persona)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
