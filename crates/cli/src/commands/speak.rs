// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ttsbus speak` — the CLI-facing entry point into the Producer API (§4.8).

use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Result;
use clap::Args;

use ttsbus_adapters::{PiperSynthesisEngine, PlatformAudioPlayer};
use ttsbus_core::id::NanoIdGen;
use ttsbus_daemon::{Config, Driver, Producer};
use ttsbus_storage::{Heartbeat, QueueDirectory, SessionStore};

use crate::env;

#[derive(Args)]
pub struct SpeakArgs {
    /// Text to speak.
    pub text: String,
    /// Session to attribute this message to. Defaults to `TTSBUS_SESSION_ID`,
    /// or a session id derived from the current directory.
    #[arg(long)]
    pub session: Option<String>,
    /// Project name shown in speaker-transition cues and queue previews.
    #[arg(long, default_value = "cli")]
    pub project: String,
    /// Persona to use instead of the session/config default.
    #[arg(long)]
    pub persona: Option<String>,
    /// Speak even if the session (or config default) is muted.
    #[arg(long)]
    pub force: bool,
}

pub async fn run(args: SpeakArgs) -> Result<()> {
    let config = Config::load()?;
    let persona_config = config.load_persona_config()?;

    let session_id = args
        .session
        .or_else(env::session_id_override)
        .unwrap_or_else(|| {
            let cwd = std::env::current_dir().unwrap_or_default();
            ttsbus_adapters::session_id_from_cwd(&cwd).to_string()
        });

    let queue = QueueDirectory::new(config.queue_dir.clone());
    let heartbeat = Heartbeat::new(config.heartbeat_path.clone());
    let sessions = SessionStore::new(config.sessions_dir.clone());
    let ids = NanoIdGen;

    let synthesis = Arc::new(PiperSynthesisEngine::new(
        ttsbus_daemon::env::piper_path(),
        ttsbus_daemon::env::voices_dir(),
    ));
    let audio = Arc::new(PlatformAudioPlayer::new());
    let poll_period = ttsbus_adapters::env::driver_poll_ms();
    let driver = Driver::new(synthesis, audio, poll_period);

    let producer = Producer::new(&queue, &heartbeat, &sessions, &persona_config, &driver, &ids);

    let spoken = producer
        .speak(
            &args.text,
            &session_id,
            &args.project,
            args.persona.as_deref(),
            args.force,
            SystemTime::now(),
        )
        .await?;

    if !spoken {
        println!("(muted or empty after filtering, not spoken)");
    }
    Ok(())
}
