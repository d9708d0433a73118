// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Platform audio players, grounded on
//! `original_source/scripts/tts-daemon.py::get_audio_player`/`play_audio`:
//! macOS plays a WAV file through `afplay -r <speed>` (the only player here
//! with a playback-rate flag); Linux pipes raw PCM straight into `paplay`,
//! falling back to `aplay`, neither of which support a speed knob.

use std::io::Write;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{AudioError, AudioPlayer};
use crate::subprocess::AUDIO_PLAYBACK_TIMEOUT;

const SAMPLE_RATE_HZ: u32 = 22_050;
const CHIME_FREQ_HZ: f32 = 880.0;
const CHIME_DURATION_SECS: f32 = 0.12;

pub struct PlatformAudioPlayer {
    timeout: Duration,
}

impl Default for PlatformAudioPlayer {
    fn default() -> Self {
        Self {
            timeout: AUDIO_PLAYBACK_TIMEOUT,
        }
    }
}

impl PlatformAudioPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, mut cmd: Command, stdin_data: Option<&[u8]>) -> Result<(), AudioError> {
        let data = stdin_data.map(|d| d.to_vec());
        let run = async move {
            let mut child = cmd.spawn().map_err(|e| AudioError::Spawn(e.to_string()))?;
            if let Some(bytes) = data {
                if let Some(mut stdin) = child.stdin.take() {
                    stdin
                        .write_all(&bytes)
                        .await
                        .map_err(|e| AudioError::Spawn(e.to_string()))?;
                }
            }
            let output = child
                .wait_with_output()
                .await
                .map_err(|e| AudioError::Spawn(e.to_string()))?;
            if !output.status.success() {
                return Err(AudioError::NonZeroExit {
                    status: output.status.code().unwrap_or(-1),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                });
            }
            Ok(())
        };

        match tokio::time::timeout(self.timeout, run).await {
            Ok(result) => result,
            Err(_) => Err(AudioError::Timeout(self.timeout)),
        }
    }

    #[cfg(target_os = "macos")]
    async fn play_pcm(&self, pcm: &[u8], speed: f32) -> Result<(), AudioError> {
        let afplay = which::which("afplay").map_err(|_| AudioError::NoPlayerAvailable)?;
        let tmp = tempfile::Builder::new()
            .suffix(".wav")
            .tempfile()
            .map_err(|e| AudioError::Spawn(e.to_string()))?;
        write_wav(tmp.path(), pcm).map_err(|e| AudioError::Spawn(e.to_string()))?;

        let mut cmd = Command::new(afplay);
        cmd.arg("-r").arg(format!("{speed:.2}")).arg(tmp.path());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        self.run(cmd, None).await
    }

    #[cfg(not(target_os = "macos"))]
    async fn play_pcm(&self, pcm: &[u8], _speed: f32) -> Result<(), AudioError> {
        if let Ok(paplay) = which::which("paplay") {
            let mut cmd = Command::new(paplay);
            cmd.arg("--raw")
                .arg("--rate=22050")
                .arg("--format=s16le")
                .arg("--channels=1");
            cmd.stdin(Stdio::piped());
            cmd.stdout(Stdio::null());
            cmd.stderr(Stdio::piped());
            cmd.kill_on_drop(true);
            return self.run(cmd, Some(pcm)).await;
        }
        if let Ok(aplay) = which::which("aplay") {
            let mut cmd = Command::new(aplay);
            cmd.arg("-q")
                .arg("-f")
                .arg("S16_LE")
                .arg("-r")
                .arg("22050")
                .arg("-c")
                .arg("1")
                .arg("-");
            cmd.stdin(Stdio::piped());
            cmd.stdout(Stdio::null());
            cmd.stderr(Stdio::piped());
            cmd.kill_on_drop(true);
            return self.run(cmd, Some(pcm)).await;
        }
        Err(AudioError::NoPlayerAvailable)
    }
}

/// Generates a short sine-wave chime in-process instead of shipping/locating
/// a bundled audio asset.
fn chime_pcm() -> Vec<u8> {
    let samples = (SAMPLE_RATE_HZ as f32 * CHIME_DURATION_SECS) as usize;
    let mut pcm = Vec::with_capacity(samples * 2);
    for n in 0..samples {
        let t = n as f32 / SAMPLE_RATE_HZ as f32;
        let fade = 1.0 - (n as f32 / samples as f32);
        let sample = (t * CHIME_FREQ_HZ * std::f32::consts::TAU).sin() * fade * i16::MAX as f32;
        pcm.extend_from_slice(&(sample as i16).to_le_bytes());
    }
    pcm
}

fn write_wav(path: &std::path::Path, pcm: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    let data_len = pcm.len() as u32;
    let byte_rate = SAMPLE_RATE_HZ * 2;

    file.write_all(b"RIFF")?;
    file.write_all(&(36 + data_len).to_le_bytes())?;
    file.write_all(b"WAVE")?;
    file.write_all(b"fmt ")?;
    file.write_all(&16u32.to_le_bytes())?;
    file.write_all(&1u16.to_le_bytes())?; // PCM
    file.write_all(&1u16.to_le_bytes())?; // mono
    file.write_all(&SAMPLE_RATE_HZ.to_le_bytes())?;
    file.write_all(&byte_rate.to_le_bytes())?;
    file.write_all(&2u16.to_le_bytes())?; // block align
    file.write_all(&16u16.to_le_bytes())?; // bits per sample
    file.write_all(b"data")?;
    file.write_all(&data_len.to_le_bytes())?;
    file.write_all(pcm)?;
    Ok(())
}

#[async_trait::async_trait]
impl AudioPlayer for PlatformAudioPlayer {
    async fn play(&self, pcm: &[u8], speed: f32) -> Result<(), AudioError> {
        self.play_pcm(pcm, speed).await
    }

    async fn play_chime(&self) -> Result<(), AudioError> {
        self.play_pcm(&chime_pcm(), 1.0).await
    }
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
