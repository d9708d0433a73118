// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real synthesis via the `piper` command-line binary. The common flags
//! (`--model <voice>`, optional `--speaker`, `--length-scale` for the
//! `length_scale`/`hybrid` speed methods) are shared, but the output shape
//! forks in two, matching two distinct ground-truth call sites:
//! `original_source/scripts/tts-daemon.py::generate_speech` writes a scratch
//! WAV via `--output_file` for the queued/daemon path, while
//! `original_source/src/ai_tts/core/speaker.py::_speak_direct` streams raw
//! PCM over stdout via `--output-raw` for direct mode.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use ttsbus_core::persona::{Persona, SpeedMethod};

use super::{OutputMode, SynthesisEngine, SynthesisError, SynthesizedAudio};
use crate::subprocess::SYNTHESIS_TIMEOUT;

pub struct PiperSynthesisEngine {
    piper_path: PathBuf,
    voices_dir: PathBuf,
    timeout: Duration,
}

impl PiperSynthesisEngine {
    pub fn new(piper_path: impl Into<PathBuf>, voices_dir: impl Into<PathBuf>) -> Self {
        Self {
            piper_path: piper_path.into(),
            voices_dir: voices_dir.into(),
            timeout: SYNTHESIS_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the shared half of the command line; callers append the
    /// output flag (`--output-raw` or `--output_file <path>`) themselves.
    fn base_command(&self, persona: &Persona) -> Command {
        let mut cmd = Command::new(&self.piper_path);
        cmd.arg("--model").arg(self.voices_dir.join(&persona.voice));
        if let Some(speaker) = persona.speaker {
            cmd.arg("--speaker").arg(speaker.to_string());
        }
        if matches!(persona.speed_method, SpeedMethod::LengthScale | SpeedMethod::Hybrid) {
            cmd.arg("--length-scale")
                .arg(format!("{:.4}", persona.effective_length_scale()));
        }
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }

    async fn run(&self, mut cmd: Command, text: &str) -> Result<std::process::Output, SynthesisError> {
        let mut child = cmd
            .spawn()
            .map_err(|e| SynthesisError::Spawn(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| SynthesisError::Spawn(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| SynthesisError::Spawn(e.to_string()))?;

        if !output.status.success() {
            return Err(SynthesisError::NonZeroExit {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output)
    }

    async fn synthesize_raw(&self, text: &str, persona: &Persona) -> Result<SynthesizedAudio, SynthesisError> {
        let mut cmd = self.base_command(persona);
        cmd.arg("--output-raw");
        let output = self.run(cmd, text).await?;
        Ok(SynthesizedAudio::new(output.stdout))
    }

    async fn synthesize_scratch_wav(&self, text: &str, persona: &Persona) -> Result<SynthesizedAudio, SynthesisError> {
        let scratch = tempfile::Builder::new()
            .suffix(".wav")
            .tempfile()
            .map_err(|e| SynthesisError::Spawn(e.to_string()))?;

        let mut cmd = self.base_command(persona);
        cmd.arg("--output_file").arg(scratch.path());
        self.run(cmd, text).await?;

        let pcm = read_wav_pcm(scratch.path()).map_err(|e| SynthesisError::InvalidOutput(e.to_string()))?;
        Ok(SynthesizedAudio::new(pcm))
    }
}

#[async_trait::async_trait]
impl SynthesisEngine for PiperSynthesisEngine {
    async fn synthesize(
        &self,
        text: &str,
        persona: &Persona,
        mode: OutputMode,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        let run = async {
            match mode {
                OutputMode::Raw => self.synthesize_raw(text, persona).await,
                OutputMode::ScratchWav => self.synthesize_scratch_wav(text, persona).await,
            }
        };

        match tokio::time::timeout(self.timeout, run).await {
            Ok(result) => result,
            Err(_) => Err(SynthesisError::Timeout(self.timeout)),
        }
    }
}

/// Reads back a canonical (44-byte header, no extra chunks) RIFF/WAVE file
/// and returns its `data` chunk — the shape both Piper's `--output_file` and
/// this crate's own `audio::platform::write_wav` produce.
fn read_wav_pcm(path: &Path) -> std::io::Result<Vec<u8>> {
    let bytes = std::fs::read(path)?;
    let invalid = || std::io::Error::new(std::io::ErrorKind::InvalidData, "not a canonical RIFF/WAVE file");
    if bytes.len() < 44 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" || &bytes[36..40] != b"data" {
        return Err(invalid());
    }
    let data_len = u32::from_le_bytes(bytes[40..44].try_into().unwrap()) as usize;
    bytes.get(44..44 + data_len).map(<[u8]>::to_vec).ok_or_else(invalid)
}

#[cfg(test)]
#[path = "piper_tests.rs"]
mod tests;
