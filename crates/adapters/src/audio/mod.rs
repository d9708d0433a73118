// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audio playback boundary: plays synthesized PCM, and the short
//! speaker-transition chime (§4.4).

mod platform;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use platform::PlatformAudioPlayer;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{AudioCall, FakeAudioPlayer};

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no supported audio player found on PATH")]
    NoPlayerAvailable,
    #[error("failed to launch player: {0}")]
    Spawn(String),
    #[error("player exited with status {status}: {stderr}")]
    NonZeroExit { status: i32, stderr: String },
    #[error("player timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Plays raw PCM audio (16-bit signed little-endian, mono, 22050 Hz) and
/// the speaker-transition chime.
#[async_trait::async_trait]
pub trait AudioPlayer: Send + Sync + 'static {
    async fn play(&self, pcm: &[u8], speed: f32) -> Result<(), AudioError>;
    async fn play_chime(&self) -> Result<(), AudioError>;
}
