// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session registry: the authoritative map of tracked sessions.
//!
//! The registry owns every presentation resource. Presentation failures are
//! logged per session and never abort the surrounding batch.

use crate::error::RegistryError;
use crate::record::{AgentSessionRecord, RecordOrigin, SessionSummary};
use indexmap::IndexMap;
use mw_adapters::{Notice, NoticeLevel, NotifyAdapter, PresentationAdapter};
use mw_core::{Identity, LifecycleState, SessionId, SessionPayload};
use std::path::PathBuf;
use std::time::Instant;

/// Title used for every desktop notice.
pub const NOTICE_TITLE: &str = "muxwatch";

pub struct SessionRegistry<P, N> {
    records: IndexMap<SessionId, AgentSessionRecord>,
    presenter: P,
    notifier: N,
    notifications: bool,
}

impl<P, N> SessionRegistry<P, N>
where
    P: PresentationAdapter,
    N: NotifyAdapter,
{
    pub fn new(presenter: P, notifier: N, notifications: bool) -> Self {
        Self {
            records: IndexMap::new(),
            presenter,
            notifier,
            notifications,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&AgentSessionRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn ids(&self) -> Vec<SessionId> {
        self.records.keys().cloned().collect()
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.records.values().map(AgentSessionRecord::summary).collect()
    }

    /// Whether `id` currently owns a live terminal.
    pub fn has_terminal(&self, id: &str) -> bool {
        self.records.get(id).is_some_and(AgentSessionRecord::has_terminal)
    }

    /// Create or update a record from a state-file payload.
    ///
    /// Returns the effective state after the health override. Only
    /// discovered records take the resolved identity; locally created ones
    /// keep the identity they were given. An absorbing state is never left.
    pub async fn upsert(
        &mut self,
        id: SessionId,
        identity: Identity,
        payload: &SessionPayload,
    ) -> LifecycleState {
        let nominal = payload.state();
        let (before, after) = match self.records.get_mut(id.as_str()) {
            Some(record) => {
                let before = record.effective_state();
                if record.origin == RecordOrigin::Discovered {
                    record.identity = identity;
                }
                if record.state.can_transition_to(nominal) {
                    record.state = nominal;
                } else {
                    tracing::debug!(
                        session_id = %id,
                        state = %record.state,
                        ignored = %nominal,
                        "ignoring update for absorbed session"
                    );
                }
                record.health = payload.health();
                record.issues = payload.issues().to_vec();
                (Some(before), record.effective_state())
            }
            None => {
                let mut record =
                    AgentSessionRecord::new(id.clone(), identity, RecordOrigin::Discovered);
                record.state = nominal;
                record.health = payload.health();
                record.issues = payload.issues().to_vec();
                let after = record.effective_state();
                tracing::info!(session_id = %id, state = %after, "session discovered");
                self.records.insert(id.clone(), record);
                (None, after)
            }
        };

        self.present(id.as_str()).await;
        if let Some(before) = before {
            self.after_change(id.as_str(), before, after).await;
        }
        after
    }

    /// Explicit lifecycle transition (trigger files, bridge, liveness).
    pub async fn transition(
        &mut self,
        id: &str,
        next: LifecycleState,
    ) -> Result<LifecycleState, RegistryError> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        if !record.state.can_transition_to(next) {
            return Err(RegistryError::Absorbing {
                id: id.to_string(),
                state: record.state,
            });
        }
        let before = record.effective_state();
        record.state = next;
        let after = record.effective_state();

        self.present(id).await;
        self.after_change(id, before, after).await;
        Ok(after)
    }

    /// Dispose presentation resources and forget the record. Idempotent.
    pub async fn remove(&mut self, id: &str) -> bool {
        let Some(mut record) = self.records.shift_remove(id) else {
            return false;
        };
        tracing::info!(session_id = %id, state = %record.state, "session removed");
        self.dispose(&mut record).await;
        true
    }

    /// Remove every record, disposing all presentation resources.
    pub async fn clear(&mut self) {
        let records: Vec<_> = self.records.drain(..).collect();
        for (_, mut record) in records {
            self.dispose(&mut record).await;
        }
    }

    /// Look up a session by identifier, display name, or substring.
    ///
    /// Precedence: exact identifier, then exact display name, then an
    /// identifier containing `token` or contained in it.
    pub fn find_by_identifier(&self, token: &str) -> Option<&SessionId> {
        if token.is_empty() {
            return None;
        }
        if let Some((id, _)) = self.records.get_key_value(token) {
            return Some(id);
        }
        self.records
            .values()
            .find(|r| r.display_name() == token)
            .or_else(|| {
                self.records
                    .values()
                    .find(|r| r.id.as_str().contains(token) || token.contains(r.id.as_str()))
            })
            .map(|r| &r.id)
    }

    /// Track a session created by a local action and give it a terminal.
    ///
    /// An existing record without a terminal is adopted; one in an absorbing
    /// state is replaced. Returns the display name.
    pub async fn register_local(
        &mut self,
        id: SessionId,
        identity: Identity,
        origin: RecordOrigin,
        cwd: Option<PathBuf>,
        now: Instant,
    ) -> Result<String, RegistryError> {
        if self
            .records
            .get(id.as_str())
            .is_some_and(|r| r.state.is_absorbing())
        {
            self.remove(id.as_str()).await;
        }
        if self.has_terminal(id.as_str()) {
            return Err(RegistryError::AlreadyAttached(id.to_string()));
        }

        let record = self
            .records
            .entry(id.clone())
            .or_insert_with(|| AgentSessionRecord::new(id.clone(), identity.clone(), origin));
        record.identity = identity;
        record.origin = origin;
        record.display_override = None;
        if cwd.is_some() {
            record.cwd = cwd;
        }
        record.monitor_since = Some(now);
        let name = record.display_name();
        tracing::info!(session_id = %id, display_name = %name, ?origin, "session registered");

        self.attach_terminal(id.as_str()).await;
        self.present(id.as_str()).await;
        Ok(name)
    }

    /// Create a terminal for a record that has none. Returns whether the
    /// record owns a terminal afterwards.
    pub async fn attach_terminal(&mut self, id: &str) -> bool {
        let view = match self.records.get(id) {
            Some(record) if record.has_terminal() => return true,
            Some(record) => record.view(),
            None => return false,
        };
        match self.presenter.create_terminal(&view).await {
            Ok(handle) => match self.records.get_mut(id) {
                Some(record) => {
                    record.set_terminal(handle);
                    true
                }
                None => false,
            },
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "terminal creation failed");
                false
            }
        }
    }

    /// Replace the display name (trigger-file override).
    pub async fn set_display_name(&mut self, id: &str, name: &str) {
        let Some(record) = self.records.get_mut(id) else {
            return;
        };
        if record.display_name() == name {
            return;
        }
        record.display_override = Some(name.to_string());
        self.present(id).await;
    }

    pub fn monitored(&self) -> Vec<SessionId> {
        self.records
            .values()
            .filter(|r| r.monitor_since.is_some())
            .map(|r| r.id.clone())
            .collect()
    }

    pub fn stop_monitoring(&mut self, id: &str) {
        if let Some(record) = self.records.get_mut(id) {
            record.monitor_since = None;
        }
    }

    /// Send a notice unless notifications are disabled.
    pub async fn announce(&self, notice: Notice) {
        if !self.notifications {
            return;
        }
        if let Err(e) = self.notifier.notify(&notice).await {
            tracing::warn!(error = %e, "notification failed");
        }
    }

    async fn after_change(&self, id: &str, before: LifecycleState, after: LifecycleState) {
        if before == after {
            return;
        }
        tracing::info!(session_id = %id, from = %before, to = %after, "state changed");
        if !after.is_notable() {
            return;
        }
        let Some(record) = self.records.get(id) else {
            return;
        };
        let body = format!(
            "{} Agent {} is now {}",
            after.icon(),
            record.display_name(),
            after
        );
        self.announce(Notice::new(NOTICE_TITLE, body, NoticeLevel::for_state(after)))
            .await;
    }

    async fn present(&self, id: &str) {
        let Some(record) = self.records.get(id) else {
            return;
        };
        let view = record.view();
        if let Some(handle) = record.terminal() {
            if let Err(e) = self.presenter.update_terminal(handle, &view).await {
                tracing::warn!(session_id = %id, error = %e, "terminal update failed");
            }
        }
        if let Err(e) = self.presenter.show_status(&view).await {
            tracing::warn!(session_id = %id, error = %e, "status update failed");
        }
    }

    async fn dispose(&self, record: &mut AgentSessionRecord) {
        if let Some(handle) = record.take_terminal() {
            if let Err(e) = self.presenter.dispose_terminal(handle).await {
                tracing::warn!(session_id = %record.id, error = %e, "terminal dispose failed");
            }
        }
        if let Err(e) = self.presenter.hide_status(&record.id).await {
            tracing::warn!(session_id = %record.id, error = %e, "status hide failed");
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
