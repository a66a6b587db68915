// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::session::{SessionAdapter, SessionError};
use async_trait::async_trait;
use mw_core::SessionId;
use std::path::{Path, PathBuf};
use tracing::Instrument;

/// Wrapper that adds tracing to any SessionAdapter
#[derive(Clone)]
pub struct TracedSession<S> {
    inner: S,
}

impl<S> TracedSession<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: SessionAdapter> SessionAdapter for TracedSession<S> {
    async fn list_sessions(&self) -> Result<Vec<String>, SessionError> {
        let start = std::time::Instant::now();
        let result = self.inner.list_sessions().await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(sessions) => tracing::debug!(count = sessions.len(), elapsed_ms, "listed sessions"),
            Err(e) => tracing::warn!(elapsed_ms, error = %e, "list sessions failed"),
        }
        result
    }

    async fn is_alive(&self, id: &SessionId) -> Result<bool, SessionError> {
        let result = self.inner.is_alive(id).await;
        tracing::trace!(session_id = %id, alive = ?result.as_ref().ok(), "checked");
        result
    }

    async fn pane_cwd(&self, id: &SessionId) -> Result<Option<PathBuf>, SessionError> {
        let result = self.inner.pane_cwd(id).await;
        tracing::trace!(session_id = %id, cwd = ?result.as_ref().ok(), "pane cwd");
        result
    }

    async fn spawn(&self, id: &SessionId, cwd: &Path, cmd: &str) -> Result<(), SessionError> {
        async {
            tracing::info!(cmd, "starting");
            let start = std::time::Instant::now();
            let result = self.inner.spawn(id, cwd, cmd).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "session created"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "spawn failed"),
            }
            result
        }
        .instrument(tracing::info_span!("session.spawn", session_id = %id, cwd = %cwd.display()))
        .await
    }

    async fn kill(&self, id: &SessionId) -> Result<(), SessionError> {
        let result = self.inner.kill(id).await;
        tracing::info_span!("session.kill", session_id = %id).in_scope(|| match &result {
            Ok(()) => tracing::info!("killed"),
            Err(e) => tracing::warn!(error = %e, "kill failed (may be expected)"),
        });
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
