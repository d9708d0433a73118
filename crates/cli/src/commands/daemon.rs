// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ttsbus daemon` — lifecycle control (§4.7).

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

use ttsbus_core::message::Message;
use ttsbus_daemon::Config;
use ttsbus_storage::QueueDirectory;

use crate::daemon_process;
use crate::output::{truncate, OutputFormat};

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon (background, or inline with --foreground)
    Start {
        /// Run inline instead of double-forking into the background
        #[arg(long)]
        foreground: bool,
        /// Force takeover of the lock from a daemon that crashed without
        /// releasing it
        #[arg(long)]
        lockpick: bool,
    },
    /// Stop the daemon
    Stop,
    /// Check daemon status
    Status,
}

pub async fn run(args: DaemonArgs, format: OutputFormat) -> Result<()> {
    match args.command {
        DaemonCommand::Start { foreground, lockpick } => start(foreground, lockpick),
        DaemonCommand::Stop => stop(),
        DaemonCommand::Status => status(format),
    }
}

fn start(foreground: bool, lockpick: bool) -> Result<()> {
    if foreground {
        let status = daemon_process::run_daemon_foreground(lockpick)?;
        if !status.success() {
            return Err(anyhow!("daemon exited with status: {status}"));
        }
        return Ok(());
    }

    let config = Config::load()?;
    if !lockpick && daemon_process::is_running(&config) {
        return Err(anyhow!("daemon already running (pid file: {})", config.pid_path.display()));
    }

    daemon_process::start_daemon_background(lockpick)?;
    println!("Daemon started");
    Ok(())
}

fn stop() -> Result<()> {
    let config = Config::load()?;
    if daemon_process::stop_daemon_sync(&config) {
        println!("Daemon stopped");
    } else {
        println!("Daemon not running");
    }
    Ok(())
}

fn status(format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let running = daemon_process::is_running(&config);
    let pid = daemon_process::read_daemon_pid(&config);

    let queue = QueueDirectory::new(config.queue_dir.clone());
    let entries = queue.list().unwrap_or_default();
    let depth = entries.len();
    let previews: Vec<String> = entries
        .iter()
        .take(5)
        .map(|entry| match &entry.message {
            Message::Speech(speech) => format!("{}: {}", speech.project, truncate(&speech.text, 40)),
            Message::Control(_) => "[control message]".to_string(),
        })
        .collect();

    let log_tail = tail_log(&config.log_path, 10);

    match format {
        OutputFormat::Text => {
            println!("Status: {}", if running { "running" } else { "not running" });
            if let Some(pid) = pid {
                println!("PID: {pid}");
            }
            println!("Queue depth: {depth}");
            if !previews.is_empty() {
                println!("Pending:");
                for preview in &previews {
                    println!("  {preview}");
                }
            }
            if !log_tail.is_empty() {
                println!("Log tail:");
                for line in &log_tail {
                    println!("  {line}");
                }
            }
        }
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "running": running,
                "pid": pid,
                "queue_depth": depth,
                "pending": previews,
                "log_tail": log_tail,
            });
            println!("{}", serde_json::to_string_pretty(&obj)?);
        }
    }

    Ok(())
}

fn tail_log(path: &std::path::Path, n: usize) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
