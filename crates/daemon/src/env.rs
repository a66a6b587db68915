// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Resolve state directory: MW_STATE_DIR > XDG_STATE_HOME/mw > ~/.local/state/mw
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("MW_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("mw"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/mw"))
}

/// Resolve workspace root: MW_WORKSPACE > current directory
pub fn workspace_root() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("MW_WORKSPACE") {
        return Ok(PathBuf::from(dir));
    }
    Ok(std::env::current_dir()?)
}

fn duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Command bridge poll interval (default: 2000ms)
pub fn bridge_poll_interval() -> Duration {
    duration_ms("MW_BRIDGE_POLL_MS").unwrap_or(Duration::from_secs(2))
}

/// Trigger/liveness monitor interval (default: 3000ms)
pub fn monitor_poll_interval() -> Duration {
    duration_ms("MW_MONITOR_POLL_MS").unwrap_or(Duration::from_secs(3))
}
