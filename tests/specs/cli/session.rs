// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

#[test]
fn show_on_an_unknown_session_reports_all_defaults() {
    let project = Project::empty();
    project
        .ttsbus()
        .args(&["session", "show", "--session", "never-seen"])
        .passes()
        .stdout_has("muted:  (default)")
        .stdout_has("persona: (default)")
        .stdout_has("speed:  (default)");
}

#[test]
fn mute_then_unmute_round_trips() {
    let project = Project::empty();
    let id = "spec-session-a";

    project.ttsbus().args(&["session", "mute", "--session", id]).passes().stdout_has("muted");
    project
        .ttsbus()
        .args(&["session", "show", "--session", id])
        .passes()
        .stdout_has("muted:  true");

    project.ttsbus().args(&["session", "unmute", "--session", id]).passes().stdout_has("unmuted");
    project
        .ttsbus()
        .args(&["session", "show", "--session", id])
        .passes()
        .stdout_has("muted:  false");
}

#[test]
fn persona_override_set_and_cleared() {
    let project = Project::empty();
    let id = "spec-session-b";

    project
        .ttsbus()
        .args(&["session", "persona", "--session", id, "robot"])
        .passes()
        .stdout_has("persona set to robot");
    project
        .ttsbus()
        .args(&["session", "show", "--session", id])
        .passes()
        .stdout_has("persona: robot");

    project
        .ttsbus()
        .args(&["session", "persona", "--session", id])
        .passes()
        .stdout_has("persona override cleared");
    project
        .ttsbus()
        .args(&["session", "show", "--session", id])
        .passes()
        .stdout_has("persona: (default)");
}

#[test]
fn speed_override_set_and_cleared() {
    let project = Project::empty();
    let id = "spec-session-c";

    project
        .ttsbus()
        .args(&["session", "speed", "--session", id, "1.8"])
        .passes()
        .stdout_has("speed set to 1.8");
    project
        .ttsbus()
        .args(&["session", "show", "--session", id])
        .passes()
        .stdout_has("speed:  1.8");

    project
        .ttsbus()
        .args(&["session", "speed", "--session", id])
        .passes()
        .stdout_has("speed override cleared");
    project
        .ttsbus()
        .args(&["session", "show", "--session", id])
        .passes()
        .stdout_has("speed:  (default)");
}

#[test]
fn show_json_reflects_the_persisted_override_record() {
    let project = Project::empty();
    let id = "spec-session-d";

    project.ttsbus().args(&["session", "mute", "--session", id]).passes();

    let run = project.ttsbus().args(&["--output", "json", "session", "show", "--session", id]).passes();
    let value: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(value["muted"], true);
    assert!(value["persona"].is_null());
}
