// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Producer API (§4.8): `speak()`, the single entry point every
//! adapter (transcript hook, direct CLI call) funnels a spoken message
//! through. Filters text, checks mute state, and either enqueues for the
//! scheduler or plays inline when the daemon looks dead.

use std::time::SystemTime;

use ttsbus_adapters::{AudioPlayer, SynthesisEngine, TextFilter};
use ttsbus_core::config::PersonaConfig;
use ttsbus_core::id::IdGen;
use ttsbus_core::message::{Message, SpeechMessage};
use ttsbus_core::session;
use ttsbus_storage::{Heartbeat, QueueDirectory, QueueError, SessionStore, SessionStoreError};

use crate::driver::Driver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Enqueue for the scheduler; the normal path.
    Queued,
    /// Daemon looks dead or the caller asked for inline playback; synthesize
    /// and play in this process instead.
    Direct,
}

#[derive(Debug, thiserror::Error)]
pub enum ProducerError {
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error(transparent)]
    SessionStore(#[from] SessionStoreError),
    #[error("unknown persona {0:?}")]
    UnknownPersona(String),
}

pub struct Producer<'a, S, A> {
    queue: &'a QueueDirectory,
    heartbeat: &'a Heartbeat,
    sessions: &'a SessionStore,
    config: &'a PersonaConfig,
    driver: &'a Driver<S, A>,
    ids: &'a dyn IdGen,
    filter: TextFilter,
}

impl<'a, S, A> Producer<'a, S, A>
where
    S: SynthesisEngine,
    A: AudioPlayer,
{
    pub fn new(
        queue: &'a QueueDirectory,
        heartbeat: &'a Heartbeat,
        sessions: &'a SessionStore,
        config: &'a PersonaConfig,
        driver: &'a Driver<S, A>,
        ids: &'a dyn IdGen,
    ) -> Self {
        Self { queue, heartbeat, sessions, config, driver, ids, filter: TextFilter::new() }
    }

    /// Speaks `text` on behalf of `session_id`/`project`, honoring mute and
    /// routing through the queue unless the daemon's heartbeat is stale.
    /// Returns `true` if the message was spoken or enqueued, `false` if it
    /// was dropped because the session is muted.
    pub async fn speak(
        &self,
        text: &str,
        session_id: &str,
        project: &str,
        persona_override: Option<&str>,
        force: bool,
        now: SystemTime,
    ) -> Result<bool, ProducerError> {
        let filtered = self.filter.filter(text);
        if filtered.trim().is_empty() {
            return Ok(false);
        }
        let filtered = truncate_chars(&filtered, self.config.max_chars);

        let overrides = self.sessions.read(session_id)?;
        if session::resolve_muted(force, &overrides, self.config.default_muted) {
            return Ok(false);
        }

        let persona_name = session::resolve_persona_name(
            persona_override,
            &overrides,
            Some(project),
            self.config,
        );
        let persona = self
            .config
            .persona(persona_name)
            .map_err(|_| ProducerError::UnknownPersona(persona_name.to_string()))?;
        let speed = session::resolve_speed(None, &overrides, persona.speed);

        let mode = self.mode(now);
        match mode {
            Mode::Direct => {
                let persona = persona.with_speed(speed);
                self.driver.play_direct(&filtered, &persona).await;
            }
            Mode::Queued => {
                let timestamp = now
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs_f64();
                let message = Message::Speech(SpeechMessage {
                    text: filtered,
                    persona: persona_name.to_string(),
                    speed,
                    session_id: session_id.to_string(),
                    project: project.to_string(),
                    timestamp,
                });
                self.queue.enqueue(&message, self.ids)?;
            }
        }
        Ok(true)
    }

    fn mode(&self, now: SystemTime) -> Mode {
        let threshold_secs = ttsbus_adapters::env::heartbeat_stale_ms().as_secs_f64();
        match self.heartbeat.is_stale(threshold_secs, now) {
            Ok(true) | Err(_) => Mode::Direct,
            Ok(false) => Mode::Queued,
        }
    }
}

/// Truncates `text` to at most `max_chars` characters, appending `...` when
/// it was cut (§3's `max_chars` contract).
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
#[path = "producer_tests.rs"]
mod tests;
