// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake session adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SessionAdapter, SessionError};
use async_trait::async_trait;
use indexmap::IndexMap;
use mw_core::SessionId;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Recorded session call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    ListSessions,
    IsAlive { id: String },
    PaneCwd { id: String },
    Spawn { id: String, cwd: PathBuf, cmd: String },
    Kill { id: String },
}

impl SessionCall {
    /// Session the call targeted, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            SessionCall::ListSessions => None,
            SessionCall::IsAlive { id }
            | SessionCall::PaneCwd { id }
            | SessionCall::Spawn { id, .. }
            | SessionCall::Kill { id } => Some(id),
        }
    }
}

/// Fake session state
#[derive(Debug, Clone)]
pub struct FakeSession {
    pub cwd: PathBuf,
    pub cmd: String,
    pub alive: bool,
}

#[derive(Default)]
struct FakeSessionState {
    sessions: IndexMap<String, FakeSession>,
    calls: Vec<SessionCall>,
    list_error: Option<String>,
    list_delay: Option<Duration>,
}

/// Fake session adapter for testing
#[derive(Clone, Default)]
pub struct FakeSessionAdapter {
    inner: Arc<Mutex<FakeSessionState>>,
}

impl FakeSessionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SessionCall> {
        self.inner.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Get a session by name
    pub fn get_session(&self, id: &str) -> Option<FakeSession> {
        self.inner.lock().sessions.get(id).cloned()
    }

    /// Add a pre-existing session (any name, valid or not)
    pub fn add_session(&self, id: &str, alive: bool) {
        self.add_session_in(id, PathBuf::new(), alive);
    }

    pub fn add_session_in(&self, id: &str, cwd: impl Into<PathBuf>, alive: bool) {
        self.inner.lock().sessions.insert(
            id.to_string(),
            FakeSession {
                cwd: cwd.into(),
                cmd: String::new(),
                alive,
            },
        );
    }

    /// Mark a session as gone
    pub fn set_dead(&self, id: &str) {
        if let Some(session) = self.inner.lock().sessions.get_mut(id) {
            session.alive = false;
        }
    }

    /// Make `list_sessions` fail until cleared with `None`
    pub fn set_list_error(&self, error: Option<&str>) {
        self.inner.lock().list_error = error.map(str::to_string);
    }

    /// Delay `list_sessions` responses (to exercise timeouts and overlap)
    pub fn set_list_delay(&self, delay: Option<Duration>) {
        self.inner.lock().list_delay = delay;
    }
}

#[async_trait]
impl SessionAdapter for FakeSessionAdapter {
    async fn list_sessions(&self) -> Result<Vec<String>, SessionError> {
        let delay = {
            let mut inner = self.inner.lock();
            inner.calls.push(SessionCall::ListSessions);
            inner.list_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let inner = self.inner.lock();
        if let Some(error) = &inner.list_error {
            return Err(SessionError::CommandFailed(error.clone()));
        }
        Ok(inner
            .sessions
            .iter()
            .filter(|(_, s)| s.alive)
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn is_alive(&self, id: &SessionId) -> Result<bool, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::IsAlive { id: id.to_string() });
        Ok(inner
            .sessions
            .get(id.as_str())
            .map(|s| s.alive)
            .unwrap_or(false))
    }

    async fn pane_cwd(&self, id: &SessionId) -> Result<Option<PathBuf>, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::PaneCwd { id: id.to_string() });
        match inner.sessions.get(id.as_str()) {
            Some(session) if session.alive => {
                Ok((!session.cwd.as_os_str().is_empty()).then(|| session.cwd.clone()))
            }
            _ => Err(SessionError::NotFound(id.to_string())),
        }
    }

    async fn spawn(&self, id: &SessionId, cwd: &Path, cmd: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Spawn {
            id: id.to_string(),
            cwd: cwd.to_path_buf(),
            cmd: cmd.to_string(),
        });

        if inner.sessions.get(id.as_str()).is_some_and(|s| s.alive) {
            return Err(SessionError::AlreadyExists(id.to_string()));
        }
        inner.sessions.insert(
            id.to_string(),
            FakeSession {
                cwd: cwd.to_path_buf(),
                cmd: cmd.to_string(),
                alive: true,
            },
        );
        Ok(())
    }

    async fn kill(&self, id: &SessionId) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Kill { id: id.to_string() });
        if let Some(session) = inner.sessions.get_mut(id.as_str()) {
            session.alive = false;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
