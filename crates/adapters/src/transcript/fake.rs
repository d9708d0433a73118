// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

use ttsbus_core::session::SessionId;

use super::{TranscriptAdapter, TranscriptError};

#[derive(Clone)]
pub struct FakeTranscriptAdapter {
    available: bool,
    session: SessionId,
    text: Arc<Mutex<Result<String, String>>>,
}

impl FakeTranscriptAdapter {
    pub fn new(session: impl Into<SessionId>, text: impl Into<String>) -> Self {
        Self {
            available: true,
            session: session.into(),
            text: Arc::new(Mutex::new(Ok(text.into()))),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            session: SessionId::new("unavailable"),
            text: Arc::new(Mutex::new(Err("unavailable".into()))),
        }
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.lock() = Ok(text.into());
    }
}

impl TranscriptAdapter for FakeTranscriptAdapter {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn detect_session(&self, _project_dir: &Path) -> SessionId {
        self.session.clone()
    }

    fn extract_text(&self, _transcript_path: &Path) -> Result<String, TranscriptError> {
        self.text
            .lock()
            .clone()
            .map_err(|_| TranscriptError::NoAssistantMessage)
    }
}
