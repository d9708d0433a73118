// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Speech synthesis boundary: turns filtered text into raw PCM audio.

mod piper;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use piper::PiperSynthesisEngine;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSynthesisEngine, SynthesisCall};

use ttsbus_core::persona::Persona;

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("failed to launch piper: {0}")]
    Spawn(String),
    #[error("piper exited with status {status}: {stderr}")]
    NonZeroExit { status: i32, stderr: String },
    #[error("piper timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("piper produced an unreadable scratch WAV: {0}")]
    InvalidOutput(String),
}

/// Which invocation shape synthesis should use, grounded on the split
/// between `original_source/scripts/tts-daemon.py::generate_speech` (scratch
/// WAV file, the queued/daemon path) and
/// `original_source/src/ai_tts/core/speaker.py::_speak_direct` (raw PCM
/// straight over stdout, the direct-mode path).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Render to a scratch WAV file under the OS temp directory, then read
    /// it back and delete it (§4.4 step 2/5).
    ScratchWav,
    /// Stream raw PCM over stdout (§4.8 step 3).
    Raw,
}

/// Raw PCM audio produced by synthesis: 16-bit signed little-endian, mono,
/// 22050 Hz — the format Piper emits, whether read off stdout or unwrapped
/// from a scratch WAV's data chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub pcm: Vec<u8>,
    pub sample_rate_hz: u32,
}

impl SynthesizedAudio {
    pub fn new(pcm: Vec<u8>) -> Self {
        Self {
            pcm,
            sample_rate_hz: 22_050,
        }
    }
}

/// Converts filtered text into audio using a given persona's voice/speed
/// settings.
#[async_trait::async_trait]
pub trait SynthesisEngine: Send + Sync + 'static {
    async fn synthesize(
        &self,
        text: &str,
        persona: &Persona,
        mode: OutputMode,
    ) -> Result<SynthesizedAudio, SynthesisError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
