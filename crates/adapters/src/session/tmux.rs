// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux session adapter

use super::{SessionAdapter, SessionError};
use crate::subprocess::{run_with_timeout, TMUX_MUTATE_TIMEOUT, TMUX_TIMEOUT};
use async_trait::async_trait;
use mw_core::SessionId;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Tmux-based session adapter
#[derive(Clone, Debug)]
pub struct TmuxAdapter {
    query_timeout: Duration,
}

impl Default for TmuxAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl TmuxAdapter {
    pub fn new() -> Self {
        Self {
            query_timeout: TMUX_TIMEOUT,
        }
    }

    /// Bound ground-truth queries by `timeout`.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    async fn query(&self, args: &[&str], description: &str) -> Result<Output, SessionError> {
        let mut cmd = Command::new("tmux");
        cmd.args(args);
        run_with_timeout(cmd, self.query_timeout, description)
            .await
            .map_err(SessionError::CommandFailed)
    }
}

/// Stderr from tmux when no server (and therefore no session) exists.
fn is_no_server(stderr: &str) -> bool {
    stderr.contains("no server running")
        || stderr.contains("error connecting to")
        || stderr.contains("no current session")
}

#[async_trait]
impl SessionAdapter for TmuxAdapter {
    async fn list_sessions(&self) -> Result<Vec<String>, SessionError> {
        let output = self
            .query(
                &["list-sessions", "-F", "#{session_name}"],
                "tmux list-sessions",
            )
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_no_server(&stderr) {
                return Ok(Vec::new());
            }
            return Err(SessionError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn is_alive(&self, id: &SessionId) -> Result<bool, SessionError> {
        // `=` forces an exact match instead of tmux's prefix matching
        let target = format!("={}", id);
        let output = self
            .query(&["has-session", "-t", &target], "tmux has-session")
            .await?;
        Ok(output.status.success())
    }

    async fn pane_cwd(&self, id: &SessionId) -> Result<Option<PathBuf>, SessionError> {
        let target = format!("={}", id);
        let output = self
            .query(
                &["display-message", "-t", &target, "-p", "#{pane_current_path}"],
                "tmux display-message",
            )
            .await?;
        if !output.status.success() {
            return Err(SessionError::NotFound(id.to_string()));
        }
        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!path.is_empty()).then(|| PathBuf::from(path)))
    }

    async fn spawn(&self, id: &SessionId, cwd: &Path, cmd: &str) -> Result<(), SessionError> {
        // Precondition: cwd must exist
        if !cwd.exists() {
            return Err(SessionError::SpawnFailed(format!(
                "working directory does not exist: {}",
                cwd.display()
            )));
        }

        if self.is_alive(id).await? {
            return Err(SessionError::AlreadyExists(id.to_string()));
        }

        let mut tmux_cmd = Command::new("tmux");
        tmux_cmd
            .arg("new-session")
            .arg("-d")
            .arg("-s")
            .arg(id.as_str())
            .arg("-c")
            .arg(cwd)
            .arg(cmd);

        let output = run_with_timeout(tmux_cmd, TMUX_MUTATE_TIMEOUT, "tmux new-session")
            .await
            .map_err(SessionError::SpawnFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(session_id = %id, stderr = %stderr, "tmux spawn failed");
            return Err(SessionError::SpawnFailed(stderr.trim().to_string()));
        }

        // Log stderr even on success - may contain useful warnings
        if !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(session_id = %id, stderr = %stderr, "tmux spawn stderr (non-fatal)");
        }

        Ok(())
    }

    async fn kill(&self, id: &SessionId) -> Result<(), SessionError> {
        // Ignore failure: the session might already be gone
        let target = format!("={}", id);
        let mut cmd = Command::new("tmux");
        cmd.args(["kill-session", "-t", &target]);
        let _ = run_with_timeout(cmd, TMUX_MUTATE_TIMEOUT, "tmux kill-session").await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
