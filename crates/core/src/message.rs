// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue message types: what gets written to `<queue_dir>/<ts>_<id>.json`.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifies one queued message (the `<id>` half of its filename).
    pub struct MessageId;
}

/// What happens to messages already queued when a control message is
/// processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreAction {
    /// Proceed straight to `post_action`.
    None,
    /// Speak everything already queued before acting on this control message.
    Drain,
}

/// What the daemon does once a control message's `pre_action` is satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostAction {
    /// Nothing further; the control message was purely a synchronization
    /// point.
    None,
    /// Re-exec the daemon in place (used for safe config/binary upgrades).
    Restart,
    /// Shut the daemon down.
    Stop,
}

/// One speech message, as produced by `ttsbus speak` or a transcript adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechMessage {
    pub text: String,
    pub persona: String,
    pub speed: f32,
    /// Opaque id of the producing session (≤ 256 chars per §3; not enforced
    /// here, producers are expected to pass a short transcript-adapter id).
    pub session_id: String,
    /// Human-readable label used for speaker-transition detection (§4.5).
    pub project: String,
    /// Seconds since the Unix epoch, fractional (mirrors the source's
    /// `time.time()` filename timestamp so ordering is lexicographic).
    pub timestamp: f64,
}

/// One control message (§4.6): the queue-entry form of daemon lifecycle
/// coordination, so it obeys the same serialized-dispatch ordering as speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlMessage {
    pub pre_action: PreAction,
    /// Spoken during `pre_action: drain`, e.g. "Installing updates. Back in
    /// a moment." Unused when `pre_action` is `none`.
    #[serde(default)]
    pub text: Option<String>,
    pub post_action: PostAction,
    pub timestamp: f64,
}

/// The two shapes a queue-directory JSON file can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Speech(SpeechMessage),
    Control(ControlMessage),
}

impl Message {
    pub fn timestamp(&self) -> f64 {
        match self {
            Message::Speech(m) => m.timestamp,
            Message::Control(m) => m.timestamp,
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
