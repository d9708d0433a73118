// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn msg(text: &str) -> SpeechMessage {
    SpeechMessage {
        text: text.into(),
        persona: "default".into(),
        speed: 1.0,
        session_id: "s".into(),
        project: "p".into(),
        timestamp: 1.0,
    }
}

#[test]
fn default_state_is_unpaused_with_nothing_in_flight() {
    let state = PlaybackState::default();
    assert!(!state.paused);
    assert_eq!(state.audio_pid, None);
    assert_eq!(state.current_message, None);
}

#[test]
fn set_paused_only_touches_paused_field() {
    let mut state = PlaybackState {
        paused: false,
        current_message: Some(msg("carried over")),
        ..Default::default()
    };
    state.apply(PlaybackStateUpdate::set_paused(true));
    assert!(state.paused);
    assert_eq!(state.current_message, Some(msg("carried over")));
}

#[test]
fn set_current_message_stores_the_message() {
    let mut state = PlaybackState::default();
    state.apply(PlaybackStateUpdate::set_current_message(msg("interrupted")));
    assert_eq!(state.current_message, Some(msg("interrupted")));
}

#[test]
fn clear_current_message_distinguishes_from_leave_unchanged() {
    let mut state = PlaybackState {
        paused: true,
        current_message: Some(msg("stale")),
        ..Default::default()
    };
    state.apply(PlaybackStateUpdate::default());
    assert_eq!(
        state.current_message,
        Some(msg("stale")),
        "no-op update must not clear"
    );

    state.apply(PlaybackStateUpdate::clear_current_message());
    assert_eq!(state.current_message, None);
}

#[test]
fn audio_pid_set_and_clear_round_trip() {
    let mut state = PlaybackState::default();
    state.apply(PlaybackStateUpdate::set_audio_pid(1234));
    assert_eq!(state.audio_pid, Some(1234));
    state.apply(PlaybackStateUpdate::clear_audio_pid());
    assert_eq!(state.audio_pid, None);
}

#[test]
fn state_serde_roundtrip() {
    let state = PlaybackState {
        paused: true,
        audio_pid: Some(42),
        current_message: Some(msg("hello")),
        updated_at: 123.5,
    };
    let json = serde_json::to_string(&state).unwrap();
    let back: PlaybackState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}
