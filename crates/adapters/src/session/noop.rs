// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op session adapter for running without a multiplexer.

use super::{SessionAdapter, SessionError};
use async_trait::async_trait;
use mw_core::SessionId;
use std::path::{Path, PathBuf};

/// Session adapter that reports no sessions and ignores mutations.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpSessionAdapter;

impl NoOpSessionAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionAdapter for NoOpSessionAdapter {
    async fn list_sessions(&self) -> Result<Vec<String>, SessionError> {
        Ok(Vec::new())
    }

    async fn is_alive(&self, _id: &SessionId) -> Result<bool, SessionError> {
        Ok(false)
    }

    async fn pane_cwd(&self, _id: &SessionId) -> Result<Option<PathBuf>, SessionError> {
        Ok(None)
    }

    async fn spawn(&self, _id: &SessionId, _cwd: &Path, _cmd: &str) -> Result<(), SessionError> {
        Ok(())
    }

    async fn kill(&self, _id: &SessionId) -> Result<(), SessionError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
