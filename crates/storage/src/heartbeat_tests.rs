// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

#[test]
fn missing_heartbeat_has_no_age_and_is_stale() {
    let dir = tempfile::tempdir().unwrap();
    let hb = Heartbeat::new(dir.path().join("heartbeat"));
    assert_eq!(hb.age_secs(SystemTime::now()).unwrap(), None);
    assert!(hb.is_stale(10.0, SystemTime::now()).unwrap());
}

#[test]
fn fresh_heartbeat_is_not_stale() {
    let dir = tempfile::tempdir().unwrap();
    let hb = Heartbeat::new(dir.path().join("heartbeat"));
    let now = SystemTime::now();
    hb.beat(now).unwrap();
    assert!(!hb.is_stale(10.0, now).unwrap());
}

#[test]
fn heartbeat_older_than_threshold_is_stale() {
    let dir = tempfile::tempdir().unwrap();
    let hb = Heartbeat::new(dir.path().join("heartbeat"));
    let beat_time = SystemTime::now();
    hb.beat(beat_time).unwrap();

    let later = beat_time + Duration::from_secs(20);
    assert!(hb.is_stale(10.0, later).unwrap());
    assert!((hb.age_secs(later).unwrap().unwrap() - 20.0).abs() < 0.01);
}

#[test]
fn malformed_heartbeat_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("heartbeat");
    std::fs::write(&path, "not-a-number").unwrap();
    let hb = Heartbeat::new(&path);
    let err = hb.age_secs(SystemTime::now()).unwrap_err();
    assert!(matches!(err, HeartbeatError::Malformed { .. }));
}

#[test]
fn remove_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let hb = Heartbeat::new(dir.path().join("heartbeat"));
    hb.beat(SystemTime::now()).unwrap();
    hb.remove().unwrap();
    hb.remove().unwrap();
    assert!(!hb.path().exists());
}
