// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transcript adapters: detect which session a hook event belongs to, and
//! pull the most recent assistant message out of its transcript.

mod claude;
mod gemini;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use claude::ClaudeTranscriptAdapter;
pub use gemini::GeminiTranscriptAdapter;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTranscriptAdapter;

use std::path::Path;
use ttsbus_core::session::SessionId;

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("failed to read transcript {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no assistant message found in transcript")]
    NoAssistantMessage,
}

/// Turns an agent's hook event / transcript into a session id and the text
/// to speak.
pub trait TranscriptAdapter: Send + Sync + 'static {
    /// Name used in logs and the `--adapter` CLI flag.
    fn name(&self) -> &'static str;

    /// Whether the underlying CLI tool this adapter targets is installed.
    fn is_available(&self) -> bool;

    /// Derives a session id from the working directory the hook fired in,
    /// mirroring the source CLI's own project-folder naming scheme.
    fn detect_session(&self, project_dir: &Path) -> SessionId;

    /// Extracts the most recent assistant message from a transcript file.
    fn extract_text(&self, transcript_path: &Path) -> Result<String, TranscriptError>;
}

/// Transforms a working directory the way Claude Code derives its project
/// folder name: `/` and `_` both become `-`.
pub(crate) fn pwd_transform(project_dir: &Path) -> String {
    project_dir
        .to_string_lossy()
        .chars()
        .map(|c| if c == '/' || c == '_' { '-' } else { c })
        .collect()
}

/// Derives a stable session id from a working directory when no transcript
/// adapter is available to detect one (§9: direct-mode invocations outside a
/// known hook still need an attributable, stable session identity).
pub fn session_id_from_cwd(project_dir: &Path) -> SessionId {
    SessionId(pwd_transform(project_dir))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
