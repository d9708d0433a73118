// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persona definitions: a named voice plus how speed is rendered for it.

use serde::{Deserialize, Serialize};

/// How a persona's speed setting is applied at synthesis/playback time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedMethod {
    /// Synthesize at normal rate, speed up the rendered audio on playback
    /// (`afplay -r <speed>`). Cheapest, but only supported by players that
    /// accept a playback-rate flag.
    Playback,
    /// Pass `1.0 / speed` as Piper's `--length-scale`, changing the
    /// synthesized audio itself. Works with any audio player.
    LengthScale,
    /// Synthesize at `persona.length_scale` and additionally apply
    /// `persona.playback_boost` at playback time. Splits the speed-up
    /// between synthesis and playback so neither alone has to carry it.
    Hybrid,
}

impl Default for SpeedMethod {
    fn default() -> Self {
        Self::Playback
    }
}

/// A named voice configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Display name, also the key it's registered under in [`crate::config::PersonaConfig::personas`].
    pub name: String,
    /// Path to the Piper voice model (`.onnx`), resolved relative to the voices directory.
    pub voice: String,
    /// Base playback speed multiplier, e.g. `1.5` for 1.5x.
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default)]
    pub speed_method: SpeedMethod,
    /// Speaker index for multi-speaker voice models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<u32>,
    /// Piper `--length-scale` used directly in `length_scale`/`hybrid` methods.
    /// Defaults to `1.0 / speed` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_scale: Option<f32>,
    /// Extra playback-rate multiplier applied on top of `length_scale` synthesis
    /// in `hybrid` mode. Defaults to `1.0` (no extra boost).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_boost: Option<f32>,
}

fn default_speed() -> f32 {
    1.0
}

impl Persona {
    /// The `--length-scale` value to pass to Piper for this persona, resolving
    /// the `length_scale`/`hybrid` method's fallback to `1.0 / speed`.
    pub fn effective_length_scale(&self) -> f32 {
        self.length_scale.unwrap_or(1.0 / self.speed)
    }

    /// The playback-rate multiplier to apply at the audio player, resolving
    /// `hybrid`'s fallback to `1.0` (no extra boost beyond synthesis).
    pub fn effective_playback_boost(&self) -> f32 {
        self.playback_boost.unwrap_or(1.0)
    }

    /// Returns a copy with `speed` overridden to `effective` (a session or
    /// per-call override), honoring each method's contract: `playback` takes
    /// it directly, `length_scale` re-derives `--length-scale` from it, and
    /// `hybrid` ignores it — its length_scale/playback_boost are fixed per
    /// persona, not driven by a speed number.
    pub fn with_speed(&self, effective: f32) -> Self {
        let mut persona = self.clone();
        match persona.speed_method {
            SpeedMethod::Playback => persona.speed = effective,
            SpeedMethod::LengthScale => {
                persona.speed = effective;
                persona.length_scale = None;
            }
            SpeedMethod::Hybrid => {}
        }
        persona
    }
}

#[cfg(test)]
#[path = "persona_tests.rs"]
mod tests;
