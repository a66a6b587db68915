// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake presentation adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{PresentationAdapter, PresentationError, TerminalHandle};
use async_trait::async_trait;
use indexmap::IndexMap;
use mw_core::{SessionId, SessionView, TerminalIdGen};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Recorded presentation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationCall {
    CreateTerminal { session_id: String, title: String },
    UpdateTerminal { terminal: String, title: String },
    DisposeTerminal { terminal: String },
    ShowStatus { session_id: String, text: String },
    HideStatus { session_id: String },
}

#[derive(Default)]
struct FakePresentationState {
    calls: Vec<PresentationCall>,
    /// Live terminals: terminal id -> current title
    terminals: IndexMap<String, String>,
    /// Visible status items: session id -> view
    statuses: IndexMap<String, SessionView>,
    failing: HashSet<String>,
}

/// Fake presentation adapter for testing
#[derive(Clone)]
pub struct FakePresentationAdapter {
    inner: Arc<Mutex<FakePresentationState>>,
    ids: TerminalIdGen,
}

impl Default for FakePresentationAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::default(),
            ids: TerminalIdGen::new("term"),
        }
    }
}

impl FakePresentationAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<PresentationCall> {
        self.inner.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Titles of terminals that have not been disposed
    pub fn live_terminals(&self) -> Vec<String> {
        self.inner.lock().terminals.values().cloned().collect()
    }

    /// Currently shown status view for a session
    pub fn status(&self, session_id: &str) -> Option<SessionView> {
        self.inner.lock().statuses.get(session_id).cloned()
    }

    pub fn status_count(&self) -> usize {
        self.inner.lock().statuses.len()
    }

    /// Make every operation for `session_id` fail
    pub fn fail_for(&self, session_id: &str) {
        self.inner.lock().failing.insert(session_id.to_string());
    }

    fn check(state: &FakePresentationState, session_id: &str) -> Result<(), PresentationError> {
        if state.failing.contains(session_id) {
            return Err(PresentationError::Unavailable(session_id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PresentationAdapter for FakePresentationAdapter {
    async fn create_terminal(&self, view: &SessionView) -> Result<TerminalHandle, PresentationError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PresentationCall::CreateTerminal {
            session_id: view.session_id.to_string(),
            title: view.title.clone(),
        });
        Self::check(&inner, view.session_id.as_str())?;
        let id = self.ids.next();
        inner.terminals.insert(id.to_string(), view.title.clone());
        Ok(TerminalHandle::new(id, view.session_id.clone()))
    }

    async fn update_terminal(
        &self,
        handle: &TerminalHandle,
        view: &SessionView,
    ) -> Result<(), PresentationError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PresentationCall::UpdateTerminal {
            terminal: handle.id().to_string(),
            title: view.title.clone(),
        });
        Self::check(&inner, handle.session_id().as_str())?;
        match inner.terminals.get_mut(handle.id().as_str()) {
            Some(title) => {
                *title = view.title.clone();
                Ok(())
            }
            None => Err(PresentationError::Unavailable(handle.id().to_string())),
        }
    }

    async fn dispose_terminal(&self, handle: TerminalHandle) -> Result<(), PresentationError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PresentationCall::DisposeTerminal {
            terminal: handle.id().to_string(),
        });
        inner.terminals.shift_remove(handle.id().as_str());
        Ok(())
    }

    async fn show_status(&self, view: &SessionView) -> Result<(), PresentationError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PresentationCall::ShowStatus {
            session_id: view.session_id.to_string(),
            text: view.status_text.clone(),
        });
        Self::check(&inner, view.session_id.as_str())?;
        inner
            .statuses
            .insert(view.session_id.to_string(), view.clone());
        Ok(())
    }

    async fn hide_status(&self, id: &SessionId) -> Result<(), PresentationError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PresentationCall::HideStatus {
            session_id: id.to_string(),
        });
        inner.statuses.shift_remove(id.as_str());
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
