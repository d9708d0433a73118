// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Driver poll interval for the queue-directory loop (§4.4, default 50ms).
pub fn driver_poll_ms() -> Duration {
    parse_duration_ms("TTSBUS_DRIVER_POLL_MS").unwrap_or(Duration::from_millis(50))
}

/// Heartbeat write interval (default 2000ms).
pub fn heartbeat_interval_ms() -> Duration {
    parse_duration_ms("TTSBUS_HEARTBEAT_INTERVAL_MS").unwrap_or(Duration::from_millis(2000))
}

/// Heartbeat staleness threshold past which the CLI bypasses the queue and
/// synthesizes directly (§4.2, default 10s).
pub fn heartbeat_stale_ms() -> Duration {
    parse_duration_ms("TTSBUS_HEARTBEAT_STALE_MS").unwrap_or(Duration::from_secs(10))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
