// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `original_source/src/ai_tts/adapters/gemini.py` is itself marked
//! "STATUS: Placeholder" and never registered; this mirrors that rather
//! than inventing a transcript format that doesn't exist yet.

use std::path::Path;

use ttsbus_core::session::SessionId;

use super::{pwd_transform, TranscriptAdapter, TranscriptError};

pub struct GeminiTranscriptAdapter;

impl TranscriptAdapter for GeminiTranscriptAdapter {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn is_available(&self) -> bool {
        which::which("gemini").is_ok()
    }

    fn detect_session(&self, project_dir: &Path) -> SessionId {
        SessionId::new(format!("gemini-{}", pwd_transform(project_dir)))
    }

    fn extract_text(&self, _transcript_path: &Path) -> Result<String, TranscriptError> {
        Err(TranscriptError::NoAssistantMessage)
    }
}

#[cfg(test)]
#[path = "gemini_tests.rs"]
mod tests;
