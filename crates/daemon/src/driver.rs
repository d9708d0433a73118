// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The synthesis/playback driver (§4.4): renders one message and plays it,
//! interruptible by the pause flag in the playback state store.

use std::sync::Arc;
use std::time::Duration;

use ttsbus_adapters::{AudioPlayer, OutputMode, SynthesisEngine, SynthesizedAudio};
use ttsbus_core::{Persona, SpeedMethod};
use ttsbus_storage::PlaybackStateStore;

/// Result of [`Driver::render_and_play`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Interrupted,
    Failed,
}

pub struct Driver<S, A> {
    synthesis: Arc<S>,
    audio: Arc<A>,
    poll_period: Duration,
}

impl<S, A> Driver<S, A>
where
    S: SynthesisEngine,
    A: AudioPlayer,
{
    pub fn new(synthesis: Arc<S>, audio: Arc<A>, poll_period: Duration) -> Self {
        Self {
            synthesis,
            audio,
            poll_period,
        }
    }

    /// Synthesizes `text` with `persona`'s voice settings, logging and
    /// returning `None` on failure rather than propagating an error — every
    /// caller's response to a synthesis failure is the same (drop this one
    /// utterance, keep the bus running).
    ///
    /// Renders to a scratch WAV (§4.4 step 2): every caller here is a
    /// scheduler-driven one (queued playback, replay, chime/announce cues),
    /// which is the daemon path's invocation shape. `play_direct` is the
    /// only caller that wants raw stdout instead.
    pub async fn synthesize(&self, text: &str, persona: &Persona) -> Option<SynthesizedAudio> {
        self.synthesize_as(text, persona, OutputMode::ScratchWav).await
    }

    async fn synthesize_as(&self, text: &str, persona: &Persona, mode: OutputMode) -> Option<SynthesizedAudio> {
        match self.synthesis.synthesize(text, persona, mode).await {
            Ok(audio) => Some(audio),
            Err(error) => {
                tracing::error!(%error, persona = %persona.name, "synthesis failed");
                None
            }
        }
    }

    /// Plays already-synthesized `audio`, polling `playback` for the pause
    /// flag every `poll_period`.
    ///
    /// The `playback` state store's `audio_pid` field cannot carry a real OS
    /// PID across the `AudioPlayer` trait boundary (platform players own
    /// their child process internally); it is set to a non-null marker
    /// while playback is in flight and cleared on every exit path, which is
    /// the full contract §4.3 actually specifies ("if `audio_pid` is
    /// non-null, some child subprocess is ... playing").
    pub async fn play(&self, audio: &SynthesizedAudio, persona: &Persona, playback: &PlaybackStateStore) -> Outcome {
        let speed = match persona.speed_method {
            SpeedMethod::Playback => persona.speed,
            SpeedMethod::LengthScale => 1.0,
            SpeedMethod::Hybrid => persona.effective_playback_boost(),
        };

        if let Err(e) = playback.apply(ttsbus_core::PlaybackStateUpdate::set_audio_pid(1)) {
            tracing::warn!(error = %e, "failed to record in-flight audio marker");
        }

        let outcome = tokio::select! {
            biased;
            result = self.audio.play(&audio.pcm, speed) => {
                match result {
                    Ok(()) => Outcome::Completed,
                    Err(error) => {
                        tracing::error!(%error, "audio playback failed");
                        Outcome::Failed
                    }
                }
            }
            () = self.wait_for_pause(playback) => Outcome::Interrupted,
        };

        if let Err(e) = playback.apply(ttsbus_core::PlaybackStateUpdate::clear_audio_pid()) {
            tracing::warn!(error = %e, "failed to clear in-flight audio marker");
        }

        outcome
    }

    /// Synthesizes and plays `text` in one call, the shape replay (§4.5 step
    /// 5) and control-message `drain` (§4.6) both want: full pause-aware
    /// playback against the shared state store.
    pub async fn render_and_play(&self, text: &str, persona: &Persona, playback: &PlaybackStateStore) -> Outcome {
        match self.synthesize(text, persona).await {
            Some(audio) => self.play(&audio, persona, playback).await,
            None => Outcome::Failed,
        }
    }

    /// Synthesizes and plays `text` without touching the shared playback
    /// state store at all (§4.8: direct mode plays "the same driver as §4.4
    /// but without polling the shared state"). Used when a producer bypasses
    /// the queue entirely — there is no scheduler tick to coordinate with, so
    /// there is nothing to poll and no `audio_pid`/`current_message` bookkeeping
    /// to do. Synthesizes with `OutputMode::Raw`, matching
    /// `speaker.py::_speak_direct`'s ground truth.
    pub async fn play_direct(&self, text: &str, persona: &Persona) -> Outcome {
        let Some(audio) = self.synthesize_as(text, persona, OutputMode::Raw).await else {
            return Outcome::Failed;
        };
        let speed = match persona.speed_method {
            SpeedMethod::Playback => persona.speed,
            SpeedMethod::LengthScale => 1.0,
            SpeedMethod::Hybrid => persona.effective_playback_boost(),
        };
        match self.audio.play(&audio.pcm, speed).await {
            Ok(()) => Outcome::Completed,
            Err(error) => {
                tracing::error!(%error, "direct audio playback failed");
                Outcome::Failed
            }
        }
    }

    /// Plays the speaker-transition chime, ignoring failures (§4.5: a chime
    /// is a cue, not a message — never worth dropping the main speech for).
    pub async fn play_chime(&self) {
        if let Err(error) = self.audio.play_chime().await {
            tracing::warn!(%error, "speaker-transition chime failed");
        }
    }

    /// Synthesizes and plays "`<project>` says:" before a speaker change
    /// (§4.5's `announce` transition). Failures are logged and otherwise
    /// ignored, same as the chime — a missed transition cue must never drop
    /// the message that follows it.
    pub async fn play_announce(&self, project: &str, persona: &Persona, playback: &PlaybackStateStore) {
        let text = format!("{project} says:");
        if let Some(audio) = self.synthesize(&text, persona).await {
            self.play(&audio, persona, playback).await;
        }
    }

    /// Resolves once `playback`'s `paused` flag is observed true. Used to
    /// race against the in-flight audio future; losing that race drops the
    /// audio future (and, via `kill_on_drop` on the underlying child),
    /// terminates the subprocess within one poll period.
    async fn wait_for_pause(&self, playback: &PlaybackStateStore) {
        loop {
            tokio::time::sleep(self.poll_period).await;
            match playback.read() {
                Ok(state) if state.paused => return,
                Ok(_) => continue,
                Err(error) => {
                    tracing::warn!(%error, "failed to read playback state during poll");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
