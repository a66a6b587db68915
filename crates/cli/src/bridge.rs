// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command bridge client.
//!
//! Drops a command file into the daemon's inbox and waits for the sibling
//! `.response` file, polling at a fixed interval until a deadline or Ctrl+C.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use mw_core::BridgeCommand;
use mw_engine::response_path;
use thiserror::Error;

static SEQUENCE: AtomicU32 = AtomicU32::new(0);

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no response from mwd within {}ms (is mwd running?)", .0.as_millis())]
    Timeout(Duration),

    #[error("cannot determine workspace root: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("interrupted while waiting for mwd")]
    Interrupted,

    #[error("failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("command bridge I/O failed on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> BridgeError + '_ {
    move |source| BridgeError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes command files and collects their responses.
pub struct BridgeClient {
    dir: PathBuf,
    poll: Duration,
    timeout: Duration,
}

impl BridgeClient {
    pub fn new(dir: impl Into<PathBuf>, poll: Duration, timeout: Duration) -> Self {
        Self {
            dir: dir.into(),
            poll,
            timeout,
        }
    }

    /// Client for the configured workspace.
    pub fn from_env() -> Result<Self, BridgeError> {
        let dir = crate::env::command_dir().map_err(BridgeError::Workspace)?;
        Ok(Self::new(
            dir,
            crate::env::response_poll(),
            crate::env::timeout_response(),
        ))
    }

    /// Submit `command` and return the daemon's response text.
    pub async fn send(&self, command: &BridgeCommand) -> Result<String, BridgeError> {
        let path = self.submit(command)?;
        match self.wait_for_response(&path).await {
            Ok(text) => Ok(text),
            Err(e) => {
                // An unanswered command must not run after we gave up on it
                let _ = std::fs::remove_file(&path);
                Err(e)
            }
        }
    }

    /// Write the command file atomically and return its path.
    pub fn submit(&self, command: &BridgeCommand) -> Result<PathBuf, BridgeError> {
        std::fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        let name = command_file_name(command);
        let path = self.dir.join(&name);
        // The staging name must not end in `.json` or the daemon could pick it up half-written
        let staging = self.dir.join(format!(".{name}.tmp"));
        let body = serde_json::to_vec(command)?;
        std::fs::write(&staging, body).map_err(io_error(&staging))?;
        std::fs::rename(&staging, &path).map_err(io_error(&path))?;
        Ok(path)
    }

    async fn wait_for_response(&self, command_file: &Path) -> Result<String, BridgeError> {
        let response = response_path(command_file);
        let deadline = Instant::now() + self.timeout;
        let mut ctrl_c = Box::pin(tokio::signal::ctrl_c());

        loop {
            match tokio::fs::read_to_string(&response).await {
                // Empty means the daemon is still writing
                Ok(text) if !text.is_empty() => {
                    let _ = tokio::fs::remove_file(&response).await;
                    return Ok(text);
                }
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(io_error(&response)(e)),
            }

            if Instant::now() >= deadline {
                return Err(BridgeError::Timeout(self.timeout));
            }
            tokio::select! {
                _ = &mut ctrl_c => return Err(BridgeError::Interrupted),
                _ = tokio::time::sleep(self.poll) => {}
            }
        }
    }
}

/// `mw-<nanos>-<pid>-<seq>-<command>.json`; names sort by submission time.
fn command_file_name(command: &BridgeCommand) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!(
        "mw-{nanos}-{}-{seq}-{}.json",
        std::process::id(),
        command.name()
    )
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
