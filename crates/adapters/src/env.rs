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

/// State-file debounce window (default: 250ms).
pub fn debounce_ms() -> Duration {
    parse_duration_ms("MW_DEBOUNCE_MS").unwrap_or(Duration::from_millis(250))
}

/// Watcher fallback poll interval (default: 5000ms).
pub fn watcher_poll_ms() -> Duration {
    parse_duration_ms("MW_WATCH_POLL_MS").unwrap_or(Duration::from_secs(5))
}

/// Ground-truth query timeout (default: 2000ms).
pub fn ground_truth_timeout_ms() -> Duration {
    parse_duration_ms("MW_GROUND_TRUTH_TIMEOUT_MS").unwrap_or(crate::subprocess::TMUX_TIMEOUT)
}
