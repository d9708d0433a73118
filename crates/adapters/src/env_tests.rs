// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn driver_poll_ms_defaults_to_50() {
    std::env::remove_var("TTSBUS_DRIVER_POLL_MS");
    assert_eq!(driver_poll_ms(), Duration::from_millis(50));
}

#[test]
#[serial]
fn driver_poll_ms_honors_override() {
    std::env::set_var("TTSBUS_DRIVER_POLL_MS", "25");
    assert_eq!(driver_poll_ms(), Duration::from_millis(25));
    std::env::remove_var("TTSBUS_DRIVER_POLL_MS");
}

#[test]
#[serial]
fn heartbeat_stale_ms_defaults_to_10s() {
    std::env::remove_var("TTSBUS_HEARTBEAT_STALE_MS");
    assert_eq!(heartbeat_stale_ms(), Duration::from_secs(10));
}
