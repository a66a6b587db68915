// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multiplexer session adapters (ground truth)

mod noop;
mod tmux;

pub use noop::NoOpSessionAdapter;
pub use tmux::TmuxAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSession, FakeSessionAdapter, SessionCall};

use async_trait::async_trait;
use mw_core::SessionId;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("session already exists: {0}")]
    AlreadyExists(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
}

/// Adapter over the terminal multiplexer.
///
/// Every method that targets a session takes a validated [`SessionId`], so an
/// identifier that fails validation can never be interpolated into a command.
#[async_trait]
pub trait SessionAdapter: Clone + Send + Sync + 'static {
    /// Names of all live sessions. A multiplexer with no server is an empty list.
    async fn list_sessions(&self) -> Result<Vec<String>, SessionError>;

    /// Check if a session is alive
    async fn is_alive(&self, id: &SessionId) -> Result<bool, SessionError>;

    /// Working directory of the session's active pane
    async fn pane_cwd(&self, id: &SessionId) -> Result<Option<PathBuf>, SessionError>;

    /// Create a detached session running `cmd` in `cwd`
    async fn spawn(&self, id: &SessionId, cwd: &Path, cmd: &str) -> Result<(), SessionError>;

    /// Kill a session; killing a missing session succeeds
    async fn kill(&self, id: &SessionId) -> Result<(), SessionError>;
}
