// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: synthesis, audio playback, text filtering,
//! and transcript reading.

pub mod audio;
pub mod env;
pub mod filters;
pub mod subprocess;
pub mod synthesis;
pub mod transcript;

pub use audio::{AudioError, AudioPlayer, PlatformAudioPlayer};
pub use filters::TextFilter;
pub use synthesis::{OutputMode, PiperSynthesisEngine, SynthesisEngine, SynthesisError, SynthesizedAudio};
pub use transcript::{
    session_id_from_cwd, ClaudeTranscriptAdapter, GeminiTranscriptAdapter, TranscriptAdapter,
    TranscriptError,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use audio::{AudioCall, FakeAudioPlayer};
#[cfg(any(test, feature = "test-support"))]
pub use synthesis::{FakeSynthesisEngine, SynthesisCall};
#[cfg(any(test, feature = "test-support"))]
pub use transcript::FakeTranscriptAdapter;
