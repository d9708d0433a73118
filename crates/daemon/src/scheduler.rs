// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The scheduler loop (§4.5): the single-threaded cooperative driver of the
//! whole bus. One [`Scheduler::tick`] call is one iteration.

use std::path::PathBuf;
use std::time::SystemTime;

use ttsbus_adapters::{AudioPlayer, SynthesisEngine};
use ttsbus_core::{ControlMessage, Message, Persona, PersonaConfig, PlaybackStateUpdate, SpeechMessage};
use ttsbus_storage::{Heartbeat, HeartbeatError, PlaybackStateError, QueueDirectory, QueueError};

use crate::control::{self, ControlOutcome};
use crate::driver::Driver;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error(transparent)]
    PlaybackState(#[from] PlaybackStateError),
    #[error(transparent)]
    Heartbeat(#[from] HeartbeatError),
}

/// What the loop driver should do after one [`Scheduler::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing terminal happened; call `tick` again.
    Continue,
    /// The bus is paused; the caller should sleep before the next tick.
    Paused,
    /// A control message requested a restart; the caller should exit the
    /// loop and re-exec. Carries the still-undeleted control file's path:
    /// per §4.6, it must survive until the new daemon has acquired the
    /// lock, so deletion is the re-exec'd process's job, not this tick's.
    Restart(PathBuf),
    /// A control message requested a stop; the caller should exit the loop.
    Stop,
}

/// Drives one user's message bus: eviction, depth enforcement, replay,
/// dequeue, speaker-transition cues, and render+play, in the order §4.5
/// specifies.
pub struct Scheduler<S, A> {
    queue: QueueDirectory,
    heartbeat: Heartbeat,
    driver: Driver<S, A>,
    config: PersonaConfig,
    last_speaker: Option<String>,
}

impl<S, A> Scheduler<S, A>
where
    S: SynthesisEngine,
    A: AudioPlayer,
{
    pub fn new(queue: QueueDirectory, heartbeat: Heartbeat, driver: Driver<S, A>, config: PersonaConfig) -> Self {
        Self {
            queue,
            heartbeat,
            driver,
            config,
            last_speaker: None,
        }
    }

    /// Runs one scheduler iteration against `playback`, using `now` as the
    /// wall-clock instant for heartbeat/eviction.
    pub async fn tick(
        &mut self,
        playback: &ttsbus_storage::PlaybackStateStore,
        now: SystemTime,
    ) -> Result<TickOutcome, SchedulerError> {
        self.heartbeat.beat(now)?;

        let evicted = self.queue.evict_stale(self.config.queue.max_age_seconds, now)?;
        if evicted > 0 {
            tracing::info!(count = evicted, "evicted stale queue entries");
        }

        let dropped = self.queue.enforce_depth(self.config.queue.max_depth)?;
        if dropped > 0 {
            tracing::warn!(count = dropped, "dropped oldest queue entries on overflow");
        }

        if playback.read()?.paused {
            return Ok(TickOutcome::Paused);
        }

        if let Some(interrupted) = playback.read()?.current_message {
            return Ok(self.replay(interrupted, playback).await);
        }

        let mut entries = self.queue.list()?;
        if entries.is_empty() {
            return Ok(TickOutcome::Continue);
        }
        let entry = entries.remove(0);

        match entry.message {
            Message::Control(control) => {
                // Left on disk until dispatch resolves: a restart hands its
                // path to the re-exec'd process, which deletes it only once
                // it holds the lock (§4.6). Other outcomes delete it here.
                match self.dispatch_control(control, playback).await {
                    ControlOutcome::Continue => {
                        self.queue.delete(&entry.path)?;
                        Ok(TickOutcome::Continue)
                    }
                    ControlOutcome::Stop => {
                        self.queue.delete(&entry.path)?;
                        Ok(TickOutcome::Stop)
                    }
                    ControlOutcome::Restart => Ok(TickOutcome::Restart(entry.path)),
                }
            }
            Message::Speech(speech) => {
                // The copy into `current_message` and the queue deletion
                // together form the crash-safe handoff (§4.5 steps 8-9): a
                // crash during synthesis must never lose the message from
                // both places at once.
                playback.apply(PlaybackStateUpdate::set_current_message(speech.clone()))?;
                self.queue.delete(&entry.path)?;
                self.speak(speech, playback).await;
                Ok(TickOutcome::Continue)
            }
        }
    }

    async fn replay(&mut self, message: SpeechMessage, playback: &ttsbus_storage::PlaybackStateStore) -> TickOutcome {
        let Some(persona) = self.resolve_persona(&message.persona) else {
            tracing::error!(persona = %message.persona, "dropping interrupted message: no persona available");
            let _ = playback.apply(PlaybackStateUpdate::clear_current_message());
            return TickOutcome::Continue;
        };
        let persona = persona.with_speed(message.speed);
        use crate::driver::Outcome;
        match self.driver.render_and_play(&message.text, &persona, playback).await {
            Outcome::Completed | Outcome::Failed => {
                let _ = playback.apply(PlaybackStateUpdate::clear_current_message());
            }
            Outcome::Interrupted => {
                // left set in state; next tick's replay branch picks it up again.
            }
        }
        TickOutcome::Continue
    }

    /// Synthesizes and plays `message`, which `tick` has already copied into
    /// `current_message` and deleted from the queue before calling this.
    /// Every early return here must clear `current_message` in turn, or a
    /// message that can't be spoken would stick there forever.
    async fn speak(&mut self, message: SpeechMessage, playback: &ttsbus_storage::PlaybackStateStore) {
        let Some(persona) = self.resolve_persona(&message.persona) else {
            tracing::error!(persona = %message.persona, "dropping message: no persona available");
            let _ = playback.apply(PlaybackStateUpdate::clear_current_message());
            return;
        };
        let persona = persona.with_speed(message.speed);

        let Some(audio) = self.driver.synthesize(&message.text, &persona).await else {
            let _ = playback.apply(PlaybackStateUpdate::clear_current_message());
            return;
        };

        let speaker_key = format!("{}:{}", message.session_id, message.project);
        let transition = match &self.last_speaker {
            None => false,
            Some(prev) => prev.as_str() != speaker_key.as_str(),
        };
        self.last_speaker = Some(speaker_key);

        if transition {
            use ttsbus_core::SpeakerTransition;
            match self.config.queue.speaker_transition {
                SpeakerTransition::Chime => self.driver.play_chime().await,
                SpeakerTransition::Announce => self.driver.play_announce(&message.project, &persona, playback).await,
                SpeakerTransition::None => {}
            }
        }

        use crate::driver::Outcome;
        match self.driver.play(&audio, &persona, playback).await {
            Outcome::Completed | Outcome::Failed => {
                let _ = playback.apply(PlaybackStateUpdate::clear_current_message());
            }
            Outcome::Interrupted => {}
        }
    }

    async fn dispatch_control(&mut self, message: ControlMessage, playback: &ttsbus_storage::PlaybackStateStore) -> ControlOutcome {
        let default_persona = self.config.active_persona().ok().cloned();
        control::dispatch(&message, &self.driver, default_persona.as_ref(), playback).await
    }

    /// Resolves `name` against the config, falling back to the default
    /// persona per §7's "Structural" error policy.
    fn resolve_persona(&self, name: &str) -> Option<Persona> {
        if let Ok(persona) = self.config.persona(name) {
            return Some(persona.clone());
        }
        tracing::warn!(persona = name, "unknown persona, falling back to default");
        self.config.active_persona().ok().cloned()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
