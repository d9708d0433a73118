// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

#[test]
fn status_when_not_running_reports_not_running() {
    let project = Project::empty();
    project.ttsbus().args(&["daemon", "status"]).passes().stdout_has("Status: not running");
}

#[test]
fn status_json_when_not_running_has_zero_queue_depth() {
    let project = Project::empty();
    let run = project.ttsbus().args(&["--output", "json", "daemon", "status"]).passes();
    let value: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(value["running"], false);
    assert_eq!(value["queue_depth"], 0);
}

#[test]
fn stop_when_not_running_reports_not_running() {
    let project = Project::empty();
    project.ttsbus().args(&["daemon", "stop"]).passes().stdout_has("Daemon not running");
}

#[test]
fn start_then_status_reports_running_with_pid() {
    let project = Project::empty();
    project.ttsbus().args(&["daemon", "start"]).passes().stdout_has("Daemon started");

    assert!(
        wait_for(SPEC_WAIT_MAX_MS, || project.pid_path().exists()),
        "daemon did not write a PID file: {}",
        project.daemon_log()
    );
    assert!(
        wait_for(SPEC_WAIT_MAX_MS, || project.heartbeat_path().exists()),
        "daemon did not beat its heartbeat: {}",
        project.daemon_log()
    );

    let run = project.ttsbus().args(&["daemon", "status"]).passes();
    run.stdout_has("Status: running").stdout_has("PID:");
}

#[test]
fn starting_twice_without_lockpick_is_rejected() {
    let project = Project::empty();
    project.ttsbus().args(&["daemon", "start"]).passes();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || project.pid_path().exists()));

    project
        .ttsbus()
        .args(&["daemon", "start"])
        .fails()
        .stderr_has("already running");
}

/// §4.2/§8: a daemon killed `-9` leaves its lock and PID files behind. A
/// second `--lockpick` start must still end up running, with a PID file
/// that reflects the *new* process, not a race against the old one.
#[test]
fn lockpick_takes_over_from_a_daemon_killed_without_cleanup() {
    let project = Project::empty();
    project.ttsbus().args(&["daemon", "start"]).passes();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || project.pid_path().exists()));
    let first_pid = project.daemon_pid().expect("first daemon should have written a PID file");

    assert!(project.daemon_kill(), "expected a live first daemon to kill");
    std::thread::sleep(std::time::Duration::from_millis(100));

    project.ttsbus().args(&["daemon", "start", "--lockpick"]).passes().stdout_has("Daemon started");

    assert!(
        wait_for(SPEC_WAIT_MAX_MS, || project.daemon_pid().is_some_and(|pid| pid != first_pid)),
        "expected a second daemon with a fresh PID to take over: {}",
        project.daemon_log()
    );
    assert!(wait_for(SPEC_WAIT_MAX_MS, || project.heartbeat_path().exists()));

    project.ttsbus().args(&["daemon", "status"]).passes().stdout_has("Status: running");
}

#[test]
fn stop_removes_pid_and_heartbeat_files() {
    let project = Project::empty();
    project.ttsbus().args(&["daemon", "start"]).passes();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || project.pid_path().exists()));

    project.ttsbus().args(&["daemon", "stop"]).passes().stdout_has("Daemon stopped");

    assert!(!project.pid_path().exists());
    assert!(!project.heartbeat_path().exists());

    project.ttsbus().args(&["daemon", "status"]).passes().stdout_has("Status: not running");
}
