// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry entries

use mw_adapters::TerminalHandle;
use mw_core::{AgentKind, HealthState, Identity, LifecycleState, SessionId, SessionView, ViewSource};
use std::path::PathBuf;
use std::time::Instant;

/// How a record came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrigin {
    /// Found in the state file or during reconciliation
    Discovered,
    /// Launched through the command bridge
    Spawned,
    /// Registered with caller-supplied identity
    Registered,
    /// Terminal attached to an existing session
    Attached,
}

impl RecordOrigin {
    /// Created by an explicit local action rather than discovery.
    pub fn is_local(self) -> bool {
        self != RecordOrigin::Discovered
    }
}

/// One tracked session.
#[derive(Debug)]
pub struct AgentSessionRecord {
    pub id: SessionId,
    pub identity: Identity,
    /// Replaces the derived display name when set by a trigger file
    pub display_override: Option<String>,
    pub state: LifecycleState,
    pub health: HealthState,
    pub issues: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub origin: RecordOrigin,
    /// When trigger/liveness monitoring started; `None` when not monitored
    pub monitor_since: Option<Instant>,
    terminal: Option<TerminalHandle>,
}

impl AgentSessionRecord {
    pub fn new(id: SessionId, identity: Identity, origin: RecordOrigin) -> Self {
        Self {
            id,
            identity,
            display_override: None,
            state: LifecycleState::Idle,
            health: HealthState::Healthy,
            issues: Vec::new(),
            cwd: None,
            origin,
            monitor_since: None,
            terminal: None,
        }
    }

    pub fn display_name(&self) -> String {
        match &self.display_override {
            Some(name) => name.clone(),
            None => self.identity.display_name(self.id.as_str()),
        }
    }

    /// State to present: `dead` health reads as terminated.
    pub fn effective_state(&self) -> LifecycleState {
        self.health.effective(self.state)
    }

    pub fn kind(&self) -> Option<AgentKind> {
        self.identity.kind()
    }

    pub fn has_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    pub fn terminal(&self) -> Option<&TerminalHandle> {
        self.terminal.as_ref()
    }

    pub(crate) fn set_terminal(&mut self, handle: TerminalHandle) {
        self.terminal = Some(handle);
    }

    pub(crate) fn take_terminal(&mut self) -> Option<TerminalHandle> {
        self.terminal.take()
    }

    pub fn view(&self) -> SessionView {
        let display = self.display_name();
        SessionView::render(&ViewSource {
            session_id: &self.id,
            identity: &self.identity,
            display_name: &display,
            state: self.state,
            health: self.health,
            issues: &self.issues,
            cwd: self.cwd.as_deref(),
        })
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            display_name: self.display_name(),
            kind: self.kind(),
            state: self.effective_state(),
            health: self.health,
            origin: self.origin,
            has_terminal: self.has_terminal(),
            monitored: self.monitor_since.is_some(),
        }
    }
}

/// Read-only copy of a record for callers outside the engine lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: SessionId,
    pub display_name: String,
    pub kind: Option<AgentKind>,
    /// Effective state
    pub state: LifecycleState,
    pub health: HealthState,
    pub origin: RecordOrigin,
    pub has_terminal: bool,
    pub monitored: bool,
}
