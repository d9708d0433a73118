// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use parking_lot::Mutex;
use std::sync::Arc;

use ttsbus_core::persona::Persona;

use super::{OutputMode, SynthesisEngine, SynthesisError, SynthesizedAudio};

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisCall {
    pub text: String,
    pub persona: String,
    pub mode: OutputMode,
}

/// Records every call and returns a fixed-size PCM buffer, for tests that
/// need a `SynthesisEngine` without invoking a real `piper` binary.
#[derive(Clone, Default)]
pub struct FakeSynthesisEngine {
    calls: Arc<Mutex<Vec<SynthesisCall>>>,
    fail_next: Arc<Mutex<bool>>,
}

impl FakeSynthesisEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SynthesisCall> {
        self.calls.lock().clone()
    }

    pub fn fail_next_call(&self) {
        *self.fail_next.lock() = true;
    }
}

#[async_trait::async_trait]
impl SynthesisEngine for FakeSynthesisEngine {
    async fn synthesize(
        &self,
        text: &str,
        persona: &Persona,
        mode: OutputMode,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        self.calls.lock().push(SynthesisCall {
            text: text.to_string(),
            persona: persona.name.clone(),
            mode,
        });
        if std::mem::take(&mut *self.fail_next.lock()) {
            return Err(SynthesisError::NonZeroExit {
                status: 1,
                stderr: "fake failure".into(),
            });
        }
        Ok(SynthesizedAudio::new(vec![0u8; 32]))
    }
}
