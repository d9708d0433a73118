// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use super::{AudioError, AudioPlayer};

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Play { pcm_len: usize, speed: f32 },
    Chime,
}

#[derive(Clone, Default)]
pub struct FakeAudioPlayer {
    calls: Arc<Mutex<Vec<AudioCall>>>,
    hang: Arc<Mutex<Option<Duration>>>,
}

impl FakeAudioPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.lock().clone()
    }

    /// Makes the next `play()` call sleep for `duration` before returning,
    /// so tests can exercise a driver's pause-interrupt race without a real
    /// subprocess.
    pub fn hang_next_play(&self, duration: Duration) {
        *self.hang.lock() = Some(duration);
    }
}

#[async_trait::async_trait]
impl AudioPlayer for FakeAudioPlayer {
    async fn play(&self, pcm: &[u8], speed: f32) -> Result<(), AudioError> {
        self.calls.lock().push(AudioCall::Play {
            pcm_len: pcm.len(),
            speed,
        });
        if let Some(duration) = std::mem::take(&mut *self.hang.lock()) {
            tokio::time::sleep(duration).await;
        }
        Ok(())
    }

    async fn play_chime(&self) -> Result<(), AudioError> {
        self.calls.lock().push(AudioCall::Chime);
        Ok(())
    }
}
