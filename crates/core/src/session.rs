// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identity and per-session overrides.
//!
//! A session is one transcript-producing conversation (one Claude Code
//! project directory, typically). Each session may override mute state,
//! persona, and speed; [`resolve_persona_name`]/[`resolve_speed`]/
//! [`resolve_muted`] implement the fallback chain described in §3/§6.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a speaking session, typically derived from the
    /// transcript-producing project's working directory.
    pub struct SessionId;
}

/// Per-session overrides, persisted as `<state_dir>/sessions/<id>.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOverride {
    /// `None` means "use the config-level default"; `Some` pins this session
    /// explicitly muted or unmuted regardless of config changes.
    pub muted: Option<bool>,
    pub persona: Option<String>,
    pub speed: Option<f32>,
}

/// Resolves the persona name to use for a message.
///
/// Order: an explicit per-call override, then this session's own persona,
/// then the persona registered as default for `project_dir` (if given), then
/// the config's global `active_persona`.
pub fn resolve_persona_name<'a>(
    explicit: Option<&'a str>,
    session: &'a SessionOverride,
    project_dir: Option<&str>,
    config: &'a crate::config::PersonaConfig,
) -> &'a str {
    if let Some(name) = explicit {
        return name;
    }
    if let Some(name) = session.persona.as_deref() {
        return name;
    }
    if let Some(dir) = project_dir {
        if let Some(name) = config.project_personas.get(dir) {
            return name.as_str();
        }
    }
    &config.active_persona
}

/// Resolves playback speed. Order: explicit override, then the session's own
/// speed, then the resolved persona's speed.
pub fn resolve_speed(explicit: Option<f32>, session: &SessionOverride, persona_speed: f32) -> f32 {
    explicit
        .or(session.speed)
        .unwrap_or(persona_speed)
}

/// Resolves whether a message should be spoken at all. `force` bypasses mute
/// entirely (used by `ttsbus speak --force`). Otherwise the session's own
/// mute override wins, falling back to the config's default.
pub fn resolve_muted(force: bool, session: &SessionOverride, default_muted: bool) -> bool {
    if force {
        return false;
    }
    session.muted.unwrap_or(default_muted)
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
