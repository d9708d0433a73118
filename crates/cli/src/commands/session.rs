// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ttsbus session` — per-session mute/persona/speed overrides (§3/§6).

use anyhow::Result;
use clap::{Args, Subcommand};

use ttsbus_daemon::Config;
use ttsbus_storage::SessionStore;

use crate::env;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Mute a session
    Mute {
        /// Session id. Defaults to `TTSBUS_SESSION_ID` or the current directory.
        #[arg(long)]
        session: Option<String>,
    },
    /// Unmute a session
    Unmute {
        #[arg(long)]
        session: Option<String>,
    },
    /// Set (or clear) a session's persona override
    Persona {
        #[arg(long)]
        session: Option<String>,
        /// Persona name, or omit to clear the override
        name: Option<String>,
    },
    /// Set (or clear) a session's speed override
    Speed {
        #[arg(long)]
        session: Option<String>,
        /// Speed multiplier, or omit to clear the override
        value: Option<f32>,
    },
    /// Show a session's current overrides
    Show {
        #[arg(long)]
        session: Option<String>,
    },
}

pub fn run(args: SessionArgs, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let sessions = SessionStore::new(config.sessions_dir.clone());

    match args.command {
        SessionCommand::Mute { session } => {
            let id = resolve_session_id(session);
            sessions.update(&id, |o| o.muted = Some(true))?;
            println!("Session {id} muted");
        }
        SessionCommand::Unmute { session } => {
            let id = resolve_session_id(session);
            sessions.update(&id, |o| o.muted = Some(false))?;
            println!("Session {id} unmuted");
        }
        SessionCommand::Persona { session, name } => {
            let id = resolve_session_id(session);
            sessions.update(&id, |o| o.persona = name.clone())?;
            match name {
                Some(name) => println!("Session {id} persona set to {name}"),
                None => println!("Session {id} persona override cleared"),
            }
        }
        SessionCommand::Speed { session, value } => {
            let id = resolve_session_id(session);
            sessions.update(&id, |o| o.speed = value)?;
            match value {
                Some(value) => println!("Session {id} speed set to {value}"),
                None => println!("Session {id} speed override cleared"),
            }
        }
        SessionCommand::Show { session } => {
            let id = resolve_session_id(session);
            let overrides = sessions.read(&id)?;
            match format {
                OutputFormat::Text => {
                    println!("Session: {id}");
                    println!("  muted:  {}", overrides.muted.map(|b| b.to_string()).unwrap_or_else(|| "(default)".into()));
                    println!("  persona: {}", overrides.persona.as_deref().unwrap_or("(default)"));
                    println!("  speed:  {}", overrides.speed.map(|s| s.to_string()).unwrap_or_else(|| "(default)".into()));
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&overrides)?);
                }
            }
        }
    }

    Ok(())
}

fn resolve_session_id(explicit: Option<String>) -> String {
    explicit.or_else(env::session_id_override).unwrap_or_else(|| {
        let cwd = std::env::current_dir().unwrap_or_default();
        ttsbus_adapters::session_id_from_cwd(&cwd).to_string()
    })
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
