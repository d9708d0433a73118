// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ttsbus - CLI for the per-user text-to-speech message bus daemon.

mod commands;
mod daemon_process;
mod env;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{daemon, persona, session, speak};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "ttsbus", version, about = "Per-user text-to-speech message bus")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daemon lifecycle control
    Daemon(daemon::DaemonArgs),
    /// Speak text through the Producer API
    Speak(speak::SpeakArgs),
    /// Persona administration
    Persona(persona::PersonaArgs),
    /// Session mute/persona/speed overrides
    Session(session::SessionArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Daemon(args) => daemon::run(args, cli.output).await,
        Commands::Speak(args) => speak::run(args).await,
        Commands::Persona(args) => persona::run(args, cli.output),
        Commands::Session(args) => session::run(args, cli.output),
    }
}
