// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ttsbus-core: shared types for the TTS message-bus daemon and CLI.

pub mod clock;
pub mod config;
pub mod error;
pub mod id;
pub mod message;
pub mod persona;
pub mod playback_state;
pub mod session;
pub mod time_fmt;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{PersonaConfig, QueueConfig, SpeakerTransition};
pub use error::ConfigError;
pub use id::{IdGen, NanoIdGen, ShortId, UuidIdGen};
pub use message::{ControlMessage, Message, MessageId, PostAction, PreAction, SpeechMessage};
pub use persona::{Persona, SpeedMethod};
pub use playback_state::{PlaybackState, PlaybackStateUpdate};
pub use session::{resolve_muted, resolve_persona_name, resolve_speed, SessionId, SessionOverride};
pub use time_fmt::{format_elapsed, format_elapsed_ms};
