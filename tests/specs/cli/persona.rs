// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

#[test]
fn list_marks_the_active_persona_with_an_asterisk() {
    let project = Project::empty();
    project.write_config(&minimal_config_json(20, false));

    let run = project.ttsbus().args(&["persona", "list"]).passes();
    run.stdout_has("* default").stdout_has("  robot");
}

#[test]
fn show_unknown_persona_fails() {
    let project = Project::empty();
    project.write_config(&minimal_config_json(20, false));

    project.ttsbus().args(&["persona", "show", "nope"]).fails().stderr_has("unknown persona");
}

#[test]
fn show_known_persona_reports_its_fields() {
    let project = Project::empty();
    project.write_config(&minimal_config_json(20, false));

    project
        .ttsbus()
        .args(&["persona", "show", "robot"])
        .passes()
        .stdout_has("voice:        en_US-robot-medium.onnx")
        .stdout_has("speed:        1.2");
}

#[test]
fn set_default_persists_the_new_global_active_persona() {
    let project = Project::empty();
    project.write_config(&minimal_config_json(20, false));

    project
        .ttsbus()
        .args(&["persona", "set-default", "robot"])
        .passes()
        .stdout_has("Default persona set to robot");

    let saved = std::fs::read_to_string(project.config_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(value["active_persona"], "robot");

    project.ttsbus().args(&["persona", "list"]).passes().stdout_has("* robot");
}

#[test]
fn set_default_for_a_project_only_scopes_that_project() {
    let project = Project::empty();
    project.write_config(&minimal_config_json(20, false));

    project
        .ttsbus()
        .args(&["persona", "set-default", "robot", "--project", "/repos/spec"])
        .passes()
        .stdout_has("Default persona for project /repos/spec set to robot");

    let saved = std::fs::read_to_string(project.config_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(value["active_persona"], "default");
    assert_eq!(value["project_personas"]["/repos/spec"], "robot");
}

#[test]
fn set_default_to_an_unknown_persona_fails_without_writing_the_config() {
    let project = Project::empty();
    project.write_config(&minimal_config_json(20, false));
    let before = std::fs::read_to_string(project.config_path()).unwrap();

    project.ttsbus().args(&["persona", "set-default", "nope"]).fails();

    let after = std::fs::read_to_string(project.config_path()).unwrap();
    assert_eq!(before, after);
}
