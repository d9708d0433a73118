// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Grounded on `original_source/src/ai_tts/adapters/claude.py`: session
//! detection walks `~/.claude/projects` for the longest-matching
//! transformed-pwd prefix; transcript extraction walks a JSONL transcript
//! from the end for the last assistant message.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde_json::Value;
use ttsbus_core::session::SessionId;

use super::{pwd_transform, TranscriptAdapter, TranscriptError};

pub struct ClaudeTranscriptAdapter {
    projects_dir: PathBuf,
}

impl ClaudeTranscriptAdapter {
    pub fn new(projects_dir: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: projects_dir.into(),
        }
    }

    /// Finds the longest project folder name under `projects_dir` that is a
    /// prefix of `transformed_pwd`, Claude Code's own disambiguation rule
    /// when a project directory is nested inside another tracked one.
    fn longest_matching_project(&self, transformed_pwd: &str) -> Option<String> {
        let entries = std::fs::read_dir(&self.projects_dir).ok()?;
        entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| transformed_pwd.starts_with(name.as_str()))
            .max_by_key(|name| name.len())
    }
}

impl TranscriptAdapter for ClaudeTranscriptAdapter {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn is_available(&self) -> bool {
        which::which("claude").is_ok()
    }

    fn detect_session(&self, project_dir: &Path) -> SessionId {
        let transformed = pwd_transform(project_dir);
        let name = self
            .longest_matching_project(&transformed)
            .unwrap_or(transformed);
        SessionId::new(name)
    }

    fn extract_text(&self, transcript_path: &Path) -> Result<String, TranscriptError> {
        let file = std::fs::File::open(transcript_path).map_err(|source| TranscriptError::Read {
            path: transcript_path.to_path_buf(),
            source,
        })?;
        let lines = read_lines_reversed(file, transcript_path)?;

        for line in lines {
            let Ok(entry) = serde_json::from_str::<Value>(&line) else {
                continue;
            };
            if entry.get("type").and_then(Value::as_str) != Some("message") {
                continue;
            }
            let message = entry.get("message").unwrap_or(&Value::Null);
            if message.get("role").and_then(Value::as_str) != Some("assistant") {
                continue;
            }
            if let Some(text) = extract_content(message.get("content").unwrap_or(&Value::Null)) {
                return Ok(text);
            }
        }
        Err(TranscriptError::NoAssistantMessage)
    }
}

fn extract_content(content: &Value) -> Option<String> {
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Array(blocks) => {
            let joined: String = blocks
                .iter()
                .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n");
            if joined.is_empty() {
                None
            } else {
                Some(joined)
            }
        }
        _ => None,
    }
}

/// Reads every line of `file`, returning them oldest-to-caller-last, i.e.
/// ready to be iterated from the end of the transcript backwards.
fn read_lines_reversed(
    file: std::fs::File,
    path: &Path,
) -> Result<Vec<String>, TranscriptError> {
    let reader = BufReader::new(file);
    let mut lines: Vec<String> = reader
        .lines()
        .collect::<Result<_, _>>()
        .map_err(|source| TranscriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    lines.reverse();
    Ok(lines)
}

#[cfg(test)]
#[path = "claude_tests.rs"]
mod tests;
