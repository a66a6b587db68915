// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;
use std::time::Duration;

use mw_engine::config::{DEFAULT_COMMAND_DIR, DEFAULT_HOOKS_DIR, TRIGGER_SUBDIR};

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

fn path_var(var: &str) -> Option<PathBuf> {
    std::env::var(var)
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Workspace root: MW_WORKSPACE > current directory
pub fn workspace_root() -> std::io::Result<PathBuf> {
    match path_var("MW_WORKSPACE") {
        Some(dir) => Ok(dir),
        None => std::env::current_dir(),
    }
}

/// Bridge inbox: MW_COMMAND_DIR > `<workspace>/_logs/agent_commands`
pub fn command_dir() -> std::io::Result<PathBuf> {
    let root = workspace_root()?;
    Ok(match path_var("MW_COMMAND_DIR") {
        Some(dir) => root.join(dir),
        None => root.join(DEFAULT_COMMAND_DIR),
    })
}

/// Trigger files live under `<hooks>/state_updates`; hooks default to
/// `<workspace>/_logs/hooks` and can be moved with MW_HOOKS_DIR.
pub fn trigger_dir() -> std::io::Result<PathBuf> {
    let root = workspace_root()?;
    let hooks = match path_var("MW_HOOKS_DIR") {
        Some(dir) => root.join(dir),
        None => root.join(DEFAULT_HOOKS_DIR),
    };
    Ok(hooks.join(TRIGGER_SUBDIR))
}

/// How long to wait for the daemon's `.response` (default: 10s)
pub fn timeout_response() -> Duration {
    parse_duration_ms("MW_TIMEOUT_RESPONSE_MS").unwrap_or(Duration::from_secs(10))
}

/// Response poll interval (default: 100ms)
pub fn response_poll() -> Duration {
    parse_duration_ms("MW_RESPONSE_POLL_MS").unwrap_or(Duration::from_millis(100))
}
