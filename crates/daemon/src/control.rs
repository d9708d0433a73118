// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The control-message protocol (§4.6): in-band `drain`/`restart`/`stop`
//! coordination, serialized on the same queue as speech so a restart never
//! cuts off a message mid-word.

use ttsbus_adapters::{AudioPlayer, SynthesisEngine};
use ttsbus_core::{ControlMessage, Persona, PostAction, PreAction};
use ttsbus_storage::PlaybackStateStore;

use crate::driver::Driver;

/// What the scheduler should do once a control message's actions have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    Continue,
    Restart,
    Stop,
}

/// Runs `message`'s `pre_action` then returns the outcome implied by its
/// `post_action`. `default_persona` voices the drain announcement, if any;
/// a missing default persona silently skips the announcement rather than
/// blocking the restart/stop it precedes.
pub async fn dispatch<S, A>(
    message: &ControlMessage,
    driver: &Driver<S, A>,
    default_persona: Option<&Persona>,
    playback: &PlaybackStateStore,
) -> ControlOutcome
where
    S: SynthesisEngine,
    A: AudioPlayer,
{
    if message.pre_action == PreAction::Drain {
        if let (Some(text), Some(persona)) = (&message.text, default_persona) {
            driver.render_and_play(text, persona, playback).await;
        }
    }

    match message.post_action {
        PostAction::None => ControlOutcome::Continue,
        PostAction::Restart => {
            tracing::info!("control message requested restart");
            ControlOutcome::Restart
        }
        PostAction::Stop => {
            tracing::info!("control message requested stop");
            ControlOutcome::Stop
        }
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
