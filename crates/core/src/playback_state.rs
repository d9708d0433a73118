// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The playback state store (§4.3): pause/resume, the in-flight audio child
//! PID, and the one-message replay buffer used when a restart interrupts
//! mid-speech playback.

use serde::{Deserialize, Serialize};

use crate::message::SpeechMessage;

/// Persisted at `<state_dir>/playback.json`, read fresh (bypassing any
/// cache) on every scheduler tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackState {
    pub paused: bool,
    /// PID of the currently playing audio subprocess, if any is in flight.
    pub audio_pid: Option<u32>,
    /// The message that was being spoken when playback was last interrupted,
    /// copied from the queue entry before its file is deleted and replayed
    /// from the start once playback is no longer paused (§9A: replay is
    /// unconditional, not gated behind a config knob).
    pub current_message: Option<SpeechMessage>,
    pub updated_at: f64,
}

/// A partial update to [`PlaybackState`]. Each `Option<Option<_>>` field
/// distinguishes "leave unchanged" (`None`) from "set to a new value,
/// possibly clearing it" (`Some(value)`), the idiomatic rendering of a
/// sentinel-value update.
#[derive(Debug, Clone, Default)]
pub struct PlaybackStateUpdate {
    pub paused: Option<bool>,
    pub audio_pid: Option<Option<u32>>,
    pub current_message: Option<Option<SpeechMessage>>,
    pub updated_at: Option<f64>,
}

impl PlaybackStateUpdate {
    pub fn set_paused(paused: bool) -> Self {
        Self {
            paused: Some(paused),
            ..Default::default()
        }
    }

    pub fn set_audio_pid(pid: u32) -> Self {
        Self {
            audio_pid: Some(Some(pid)),
            ..Default::default()
        }
    }

    pub fn clear_audio_pid() -> Self {
        Self {
            audio_pid: Some(None),
            ..Default::default()
        }
    }

    pub fn set_current_message(msg: SpeechMessage) -> Self {
        Self {
            current_message: Some(Some(msg)),
            ..Default::default()
        }
    }

    pub fn clear_current_message() -> Self {
        Self {
            current_message: Some(None),
            ..Default::default()
        }
    }

    pub fn at(mut self, updated_at: f64) -> Self {
        self.updated_at = Some(updated_at);
        self
    }
}

impl PlaybackState {
    /// Applies a partial update in place, leaving untouched fields as-is.
    pub fn apply(&mut self, update: PlaybackStateUpdate) {
        if let Some(paused) = update.paused {
            self.paused = paused;
        }
        if let Some(audio_pid) = update.audio_pid {
            self.audio_pid = audio_pid;
        }
        if let Some(current_message) = update.current_message {
            self.current_message = current_message;
        }
        if let Some(updated_at) = update.updated_at {
            self.updated_at = updated_at;
        }
    }
}

#[cfg(test)]
#[path = "playback_state_tests.rs"]
mod tests;
