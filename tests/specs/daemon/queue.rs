// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

#[test]
fn speak_without_a_running_daemon_plays_direct_and_never_touches_the_queue() {
    let project = Project::empty();
    project.write_config(&minimal_config_json(20, false));

    project
        .ttsbus()
        .args(&["speak", "hello there", "--project", "spec"])
        .passes()
        .stdout_lacks("muted");

    assert_eq!(project.queue_depth(), 0, "no daemon is running, so speak() must take the direct-mode path");
}

#[test]
fn speak_is_a_no_op_when_the_session_is_muted_by_default() {
    let project = Project::empty();
    // default_muted is true unless a config says otherwise (§6's shipped default).
    project.write_config(&minimal_config_json(20, true));

    project
        .ttsbus()
        .args(&["speak", "hello there", "--project", "spec"])
        .passes()
        .stdout_has("muted or empty");

    assert_eq!(project.queue_depth(), 0);
}

#[test]
fn speak_force_bypasses_mute_even_with_default_muted_true() {
    let project = Project::empty();
    project.write_config(&minimal_config_json(20, true));

    project
        .ttsbus()
        .args(&["speak", "hello there", "--project", "spec", "--force"])
        .passes()
        .stdout_lacks("muted");
}

#[test]
fn session_mute_override_takes_priority_over_force_free_default() {
    let project = Project::empty();
    project.write_config(&minimal_config_json(20, false));

    project.ttsbus().args(&["session", "mute", "--session", "spec-session"]).passes();

    project
        .ttsbus()
        .args(&["speak", "hi", "--session", "spec-session", "--project", "spec"])
        .passes()
        .stdout_has("muted or empty");
}

/// §4.5/§4.1: once the daemon is running and the heartbeat is fresh, `speak`
/// enqueues instead of playing inline. Pausing the bus right after start lets
/// us enqueue past `max_depth` and observe drop-head eviction without racing
/// the scheduler's own dequeue loop (eviction runs every tick even while
/// paused, per `Scheduler::tick`).
#[test]
fn overflow_drops_the_oldest_entries_once_the_queue_exceeds_max_depth() {
    let project = Project::empty();
    project.write_config(&minimal_config_json(3, false));

    project.ttsbus().args(&["daemon", "start"]).passes();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || project.heartbeat_path().exists()));

    project.write_playback_state(r#"{"paused": true, "audio_pid": null, "current_message": null, "updated_at": 0.0}"#);
    assert!(wait_for(SPEC_WAIT_MAX_MS, || std::fs::read_to_string(project.playback_path())
        .map(|s| s.contains("\"paused\":true"))
        .unwrap_or(false)));

    for i in 0..5 {
        project
            .ttsbus()
            .args(&["speak", &format!("message {i}"), "--project", "spec"])
            .passes();
        // Distinct filename timestamps rely on real wall-clock progress.
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    assert!(
        wait_for(SPEC_WAIT_MAX_MS, || project.queue_depth() == 3),
        "expected depth-enforcement to settle at 3, got {} ({:?})",
        project.queue_depth(),
        project.queue_entry_names()
    );

    let texts = project.queue_speech_texts();
    assert_eq!(texts, vec!["message 2", "message 3", "message 4"], "drop-head should keep only the 3 newest entries");
}

/// §4.8 step 3 / scenario 6: a daemon killed without cleaning up its
/// heartbeat file still leaves the file on disk, but stops refreshing it.
/// Once it's older than the stale threshold, `speak` bypasses the queue
/// entirely and synthesizes inline instead of waiting for a dead scheduler.
#[test]
fn speak_bypasses_the_queue_once_the_heartbeat_goes_stale() {
    let project = Project::empty();
    project.write_config(&minimal_config_json(20, false));

    project.ttsbus().args(&["daemon", "start"]).passes();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || project.heartbeat_path().exists()));

    assert!(project.daemon_kill(), "expected a live daemon process to kill");
    std::thread::sleep(std::time::Duration::from_millis(120));

    project
        .ttsbus()
        .args(&["speak", "is anyone still listening", "--project", "spec"])
        .env("TTSBUS_HEARTBEAT_STALE_MS", "60")
        .passes()
        .stdout_lacks("muted");

    assert_eq!(project.queue_depth(), 0, "a stale heartbeat must route speak() through direct mode, not the queue");
}
