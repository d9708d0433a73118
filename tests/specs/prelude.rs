//! Test helpers for behavioral specifications.
//!
//! Provides a high-level DSL for driving the `ttsbus`/`ttsbusd` binaries
//! black-box: real processes, real files under a temp state directory, no
//! in-process fakes. Scenarios that need a working Piper binary or real
//! speakers (speaker-transition cues, pause/resume mid-playback replay) are
//! covered instead by the scheduler/driver unit tests, which use the
//! synthesis/audio fakes for exactly that reason.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// Aggressive timings so scheduler-driven scenarios settle fast.
const DRIVER_POLL_MS: &str = "10";
const HEARTBEAT_INTERVAL_MS: &str = "20";
const HEARTBEAT_STALE_MS: &str = "300";

pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 3000;

/// Returns the path to a binary, checking the llvm-cov target directory
/// first. Falls back to resolving relative to the test binary itself when
/// `CARGO_MANIFEST_DIR` is stale (e.g. compiled by a removed worktree into a
/// shared target directory).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    // Fallback: resolve relative to the test binary itself. It lives at
    // target/debug/deps/specs-<hash>, so its grandparent is target/debug/,
    // where ttsbus and ttsbusd are built.
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

fn ttsbus_binary() -> PathBuf {
    binary_path("ttsbus")
}

/// Returns the path to the ttsbusd daemon binary.
pub fn ttsbusd_binary() -> PathBuf {
    binary_path("ttsbusd")
}

/// Returns a Command configured to run the ttsbus binary.
pub fn ttsbus_cmd() -> Command {
    Command::new(ttsbus_binary())
}

/// Create a CLI builder for ttsbus commands.
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

/// High-level CLI builder for fluent test assertions.
pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            dir: None,
            envs: vec![
                ("TTSBUS_DAEMON_BINARY".into(), ttsbusd_binary().to_string_lossy().into()),
                ("TTSBUS_DRIVER_POLL_MS".into(), DRIVER_POLL_MS.into()),
                ("TTSBUS_HEARTBEAT_INTERVAL_MS".into(), HEARTBEAT_INTERVAL_MS.into()),
                ("TTSBUS_HEARTBEAT_STALE_MS".into(), HEARTBEAT_STALE_MS.into()),
                // No piper binary is installed in the test environment; point
                // at a name that fails cleanly so synthesis errors (logged,
                // non-fatal) instead of hanging on a real subprocess.
                ("TTSBUS_PIPER_PATH".into(), "ttsbus-spec-no-such-piper".into()),
            ],
        }
    }

    /// Add CLI arguments.
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set working directory.
    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    /// Set environment variable.
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((key.to_string(), value.as_ref().to_string_lossy().to_string()));
        self
    }

    /// Build the command without running it.
    pub fn command(self) -> Command {
        let mut cmd = ttsbus_cmd();
        cmd.args(&self.args);

        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }

        for (key, value) in self.envs {
            cmd.env(key, value);
        }

        cmd
    }

    /// Run and expect success (exit code 0).
    pub fn passes(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code).
    pub fn fails(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions.
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert stdout equals expected exactly (with diff on failure).
    pub fn stdout_eq(self, expected: &str) -> Self {
        let stdout = self.stdout();
        similar_asserts::assert_eq!(stdout, expected);
        self
    }

    /// Assert stdout contains substring.
    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(expected), "stdout does not contain '{}'\nstdout: {}", expected, stdout);
        self
    }

    /// Assert stdout does not contain substring.
    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(!stdout.contains(unexpected), "stdout should not contain '{}'\nstdout: {}", unexpected, stdout);
        self
    }

    /// Assert stderr contains substring.
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(expected), "stderr does not contain '{}'\nstderr: {}", expected, stderr);
        self
    }
}

// =============================================================================
// Polling
// =============================================================================

/// Poll a condition until it returns true or timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

// =============================================================================
// Project
// =============================================================================

/// A temporary test project: an isolated state directory (`TTSBUS_STATE_DIR`)
/// plus a working directory whose path stands in for "the caller's cwd" that
/// session-id-from-cwd derivation falls back to.
pub struct Project {
    dir: tempfile::TempDir,
    state_dir: tempfile::TempDir,
}

impl Project {
    /// Create an empty project with the shipped config defaults.
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            state_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_path(&self) -> &Path {
        self.state_dir.path()
    }

    /// Run a `ttsbus` command in this project's context.
    pub fn ttsbus(&self) -> CliBuilder {
        cli().pwd(self.path()).env("TTSBUS_STATE_DIR", self.state_path())
    }

    pub fn config_path(&self) -> PathBuf {
        self.state_path().join("config.json")
    }

    pub fn queue_dir(&self) -> PathBuf {
        self.state_path().join("queue")
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.state_path().join("sessions")
    }

    pub fn pid_path(&self) -> PathBuf {
        self.state_path().join("daemon.pid")
    }

    pub fn heartbeat_path(&self) -> PathBuf {
        self.state_path().join("daemon.heartbeat")
    }

    pub fn playback_path(&self) -> PathBuf {
        self.state_path().join("playback.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_path().join("daemon.log")
    }

    /// Writes `config.json`, creating the state directory if needed.
    pub fn write_config(&self, json: &str) {
        std::fs::create_dir_all(self.state_path()).unwrap();
        std::fs::write(self.config_path(), json).unwrap();
    }

    /// Writes `playback.json` directly. There is no CLI surface for pause;
    /// the file contract itself is the documented integration point (§4.3).
    pub fn write_playback_state(&self, json: &str) {
        std::fs::create_dir_all(self.state_path()).unwrap();
        std::fs::write(self.playback_path(), json).unwrap();
    }

    /// Number of `*.json` entries currently sitting in the queue directory.
    pub fn queue_depth(&self) -> usize {
        std::fs::read_dir(self.queue_dir())
            .map(|rd| {
                rd.filter_map(|e| e.ok())
                    .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("json"))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Sorted filenames of the entries in the queue directory (arrival
    /// order, since filenames are timestamp-prefixed).
    pub fn queue_entry_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.queue_dir())
            .map(|rd| {
                rd.filter_map(|e| e.ok())
                    .filter_map(|e| e.file_name().to_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// The `text` field of every `speech` message currently queued, in
    /// arrival order (filenames sort lexicographically by timestamp).
    pub fn queue_speech_texts(&self) -> Vec<String> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(self.queue_dir())
            .map(|rd| rd.filter_map(|e| e.ok()).map(|e| e.path()).collect())
            .unwrap_or_default();
        paths.sort();
        paths
            .into_iter()
            .filter_map(|path| {
                let bytes = std::fs::read(path).ok()?;
                let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
                value.get("text")?.as_str().map(str::to_string)
            })
            .collect()
    }

    /// Read the daemon log file contents (for debugging test failures).
    pub fn daemon_log(&self) -> String {
        std::fs::read_to_string(self.log_path()).unwrap_or_else(|_| "(no daemon log)".to_string())
    }

    pub fn daemon_pid(&self) -> Option<u32> {
        std::fs::read_to_string(self.pid_path()).ok()?.trim().parse().ok()
    }

    /// Kill the daemon process with SIGKILL (simulates a crash).
    pub fn daemon_kill(&self) -> bool {
        let Some(pid) = self.daemon_pid() else {
            return false;
        };
        Command::new("kill")
            .args(["-9", &pid.to_string()])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl Drop for Project {
    fn drop(&mut self) {
        // Always try to stop the daemon; a no-op if one isn't running.
        let mut cmd = self.ttsbus().args(&["daemon", "stop"]).command();
        cmd.stdout(std::process::Stdio::null()).stderr(std::process::Stdio::null());
        let _ = cmd.status();
    }
}

/// A minimal config with one persona, `default_muted` off, and a small
/// `max_depth` so overflow/eviction scenarios don't need many messages.
pub fn minimal_config_json(max_depth: usize, default_muted: bool) -> String {
    format!(
        r#"{{
  "active_persona": "default",
  "default_muted": {default_muted},
  "max_chars": 10000,
  "personas": {{
    "default": {{
      "name": "default",
      "voice": "en_US-amy-medium.onnx",
      "speed": 1.0,
      "speed_method": "playback",
      "speaker": null,
      "length_scale": null,
      "playback_boost": null
    }},
    "robot": {{
      "name": "robot",
      "voice": "en_US-robot-medium.onnx",
      "speed": 1.2,
      "speed_method": "playback",
      "speaker": null,
      "length_scale": null,
      "playback_boost": null
    }}
  }},
  "project_personas": {{}},
  "queue": {{
    "max_depth": {max_depth},
    "max_age_seconds": 300,
    "speaker_transition": "chime",
    "coalesce_rapid_ms": 500,
    "idle_poll_ms": 20
  }}
}}"#
    )
}
