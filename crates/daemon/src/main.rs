// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ttsbusd`: entry point. Parses flags, daemonizes (unless `--foreground`),
//! installs logging, acquires the singleton lock, and runs the scheduler
//! loop until a signal or control message ends it.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use ttsbus_adapters::{PlatformAudioPlayer, PiperSynthesisEngine};
use ttsbus_daemon::{daemonize, Config, ConfigLoadError, DaemonLock, Driver, LockError, Scheduler, SchedulerError, TickOutcome};
use ttsbus_storage::{Heartbeat, PlaybackStateStore, QueueDirectory};

#[derive(Debug, Parser)]
#[command(name = "ttsbusd", about = "Per-user text-to-speech message bus daemon")]
struct Args {
    /// Run inline instead of double-forking into the background.
    #[arg(long)]
    foreground: bool,
    /// Force takeover of the singleton lock from a daemon that crashed
    /// without releasing it.
    #[arg(long)]
    lockpick: bool,
    /// Set by `reexec_foreground` on a control-restart: the control
    /// message's queue file, left undeleted by the predecessor, to remove
    /// once this process has acquired the lock.
    #[arg(long, hide = true)]
    pending_control_file: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigLoadError),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// What the daemon should do once its event loop returns.
enum ExitAction {
    Stop,
    /// Carries the pending control file's path, handed to the re-exec'd
    /// process so it can delete it only after taking the lock (§4.6).
    Restart(PathBuf),
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match ttsbus_daemon::Config::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("ttsbusd: failed to resolve state directory: {error}");
            return ExitCode::FAILURE;
        }
    };

    if !args.foreground {
        if let Err(error) = daemonize(&config.log_path) {
            eprintln!("ttsbusd: failed to daemonize: {error}");
            return ExitCode::FAILURE;
        }
    }

    let _log_guard = match init_logging(&config.log_path, args.foreground) {
        Ok(guard) => guard,
        Err(error) => {
            eprintln!("ttsbusd: failed to initialize logging: {error}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(pid = std::process::id(), foreground = args.foreground, "ttsbusd starting");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(error) => {
            tracing::error!(%error, "failed to start tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    let outcome = runtime.block_on(run(config, args.lockpick, args.pending_control_file));
    drop(runtime);

    match outcome {
        Ok(ExitAction::Stop) => ExitCode::SUCCESS,
        Ok(ExitAction::Restart(control_path)) => {
            let error = reexec_foreground(&control_path);
            tracing::error!(%error, "restart re-exec failed");
            ExitCode::FAILURE
        }
        Err(error) => {
            tracing::error!(%error, "ttsbusd exited with error");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(
    log_path: &std::path::Path,
    foreground: bool,
) -> Result<tracing_appender::non_blocking::WorkerGuard, std::io::Error> {
    let dir = log_path.parent().unwrap_or_else(|| std::path::Path::new("."));
    std::fs::create_dir_all(dir)?;
    let file_name = log_path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("daemon.log"));
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    if foreground {
        let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        let _ = registry.with(stderr_layer).try_init();
    } else {
        let _ = registry.try_init();
    }

    Ok(guard)
}

async fn run(config: Config, lockpick: bool, pending_control_file: Option<PathBuf>) -> Result<ExitAction, DaemonError> {
    let lock = DaemonLock::acquire(&config.lock_path, &config.pid_path, lockpick)?;
    tracing::info!("singleton lock acquired");

    if let Some(path) = pending_control_file {
        // The predecessor left this control file on disk until we got here
        // (§4.6). Now that we hold the lock, it's safe to remove it — a
        // crash before this point just means the next daemon re-dispatches
        // the same restart, which is harmless.
        let _ = std::fs::remove_file(&path);
    }

    let persona_config = config.load_persona_config()?;
    let synthesis = Arc::new(PiperSynthesisEngine::new(ttsbus_daemon::env::piper_path(), ttsbus_daemon::env::voices_dir()));
    let audio = Arc::new(PlatformAudioPlayer::new());
    let poll_period = ttsbus_adapters::env::driver_poll_ms();

    let announce_driver = Driver::new(Arc::clone(&synthesis), Arc::clone(&audio), poll_period);
    let driver = Driver::new(synthesis, audio, poll_period);

    let queue = QueueDirectory::new(config.queue_dir.clone());
    let heartbeat = Heartbeat::new(config.heartbeat_path.clone());
    let playback = PlaybackStateStore::new(config.playback_path.clone());

    let idle_poll = Duration::from_millis(persona_config.queue.idle_poll_ms);
    let mut scheduler = Scheduler::new(queue, heartbeat, driver, persona_config.clone());

    if let Ok(default_persona) = persona_config.active_persona() {
        if let Some(audio) = announce_driver.synthesize("voice daemon online", default_persona).await {
            announce_driver.play(&audio, default_persona, &playback).await;
        }
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    spawn_signal_listener(Arc::clone(&shutdown));

    let action = loop {
        if shutdown.load(Ordering::Acquire) {
            break ExitAction::Stop;
        }
        match scheduler.tick(&playback, SystemTime::now()).await {
            Ok(TickOutcome::Continue | TickOutcome::Paused) => tokio::time::sleep(idle_poll).await,
            Ok(TickOutcome::Stop) => break ExitAction::Stop,
            Ok(TickOutcome::Restart(control_path)) => break ExitAction::Restart(control_path),
            Err(error) => {
                tracing::error!(%error, "scheduler tick failed");
                tokio::time::sleep(idle_poll).await;
            }
        }
    };

    if matches!(action, ExitAction::Stop) {
        if let Ok(default_persona) = persona_config.active_persona() {
            if let Some(audio) = announce_driver.synthesize("voice daemon shutting down", default_persona).await {
                announce_driver.play(&audio, default_persona, &playback).await;
            }
        }
    }

    let _ = std::fs::remove_file(&config.heartbeat_path);
    let _ = std::fs::remove_file(&config.pid_path);
    drop(lock);

    Ok(action)
}

fn spawn_signal_listener(shutdown: Arc<AtomicBool>) {
    tokio::spawn(async move {
        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                return;
            }
        };
        let mut interrupt = match signal(SignalKind::interrupt()) {
            Ok(stream) => stream,
            Err(error) => {
                tracing::error!(%error, "failed to install SIGINT handler");
                return;
            }
        };
        // Ignore terminal hangup (§4.7) rather than let the default
        // disposition kill the daemon when its controlling terminal closes.
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(error) => {
                tracing::error!(%error, "failed to install SIGHUP handler");
                return;
            }
        };

        loop {
            tokio::select! {
                _ = terminate.recv() => {
                    tracing::info!("received SIGTERM");
                    break;
                }
                _ = interrupt.recv() => {
                    tracing::info!("received SIGINT");
                    break;
                }
                _ = hangup.recv() => {
                    tracing::debug!("ignoring SIGHUP");
                    continue;
                }
            }
        }
        shutdown.store(true, Ordering::Release);
    });
}

/// Re-execs the current binary in foreground mode, used for a control
/// message's `restart` post-action. The process is already daemonized and
/// detached, so a second double-fork would be redundant; only the image is
/// replaced, keeping the same PID. Passes `control_path` along so the new
/// process deletes it only once it has acquired the lock.
fn reexec_foreground(control_path: &std::path::Path) -> std::io::Error {
    use std::os::unix::process::CommandExt;
    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(error) => return error,
    };
    std::process::Command::new(exe)
        .arg("--foreground")
        .arg("--pending-control-file")
        .arg(control_path)
        .exec()
}
