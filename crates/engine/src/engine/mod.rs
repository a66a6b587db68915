// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine that keeps the session registry in sync with its inputs

mod handlers;

use crate::bridge::CommandBridge;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::monitor;
use crate::reconcile::{self, ReconcileIntent, ReconcileReport};
use crate::record::SessionSummary;
use crate::registry::{SessionRegistry, NOTICE_TITLE};
use crate::store::SessionStateStore;
use mw_adapters::{Notice, NotifyAdapter, PresentationAdapter, SessionAdapter, WatchEvent};
use mw_core::{
    diff_snapshots, resolve, BridgeCommand, ChangeKind, Clock, SessionChange, SessionId,
    StateSnapshot,
};
use std::sync::atomic::{AtomicBool, Ordering};

/// Engine adapter dependencies
pub struct EngineDeps<S, P, N> {
    pub sessions: S,
    pub presenter: P,
    pub notifier: N,
}

/// State guarded by the engine lock.
pub(crate) struct EngineState<P, N> {
    pub(crate) registry: SessionRegistry<P, N>,
    pub(crate) store: SessionStateStore,
}

/// Engine that coordinates the registry, the state store and the bridge.
///
/// Every mutation of the registry goes through one async lock, so watcher
/// events, monitor ticks, bridge commands and reconciliation never
/// interleave.
pub struct Engine<S, P, N, C: Clock> {
    sessions: S,
    clock: C,
    config: EngineConfig,
    bridge: CommandBridge,
    state: tokio::sync::Mutex<EngineState<P, N>>,
    reconciling: AtomicBool,
    /// Set by `shutdown`; later passes leave the registry alone.
    closed: AtomicBool,
}

/// Clears the in-flight reconcile flag on drop.
struct ReconcileGuard<'a>(&'a AtomicBool);

impl Drop for ReconcileGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<S, P, N, C> Engine<S, P, N, C>
where
    S: SessionAdapter,
    P: PresentationAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    pub fn new(deps: EngineDeps<S, P, N>, clock: C, config: EngineConfig) -> Self {
        let registry = SessionRegistry::new(deps.presenter, deps.notifier, config.notifications);
        let store = SessionStateStore::new(&config.state_file);
        Self {
            sessions: deps.sessions,
            clock,
            bridge: CommandBridge::new(&config.command_dir),
            config,
            state: tokio::sync::Mutex::new(EngineState { registry, store }),
            reconciling: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Summaries of every tracked session, in insertion order.
    pub async fn sessions(&self) -> Vec<SessionSummary> {
        self.state.lock().await.registry.summaries()
    }

    /// Summary of one tracked session
    pub async fn session(&self, id: &str) -> Option<SessionSummary> {
        self.state.lock().await.registry.get(id).map(|r| r.summary())
    }

    /// Last snapshot applied from the state file.
    pub async fn current_snapshot(&self) -> StateSnapshot {
        self.state.lock().await.store.current().clone()
    }

    /// Apply one watcher event.
    pub async fn apply_watch_event(&self, event: WatchEvent) -> Vec<SessionChange> {
        match event {
            WatchEvent::Snapshot(snapshot) => self.apply_snapshot(snapshot).await,
            WatchEvent::ParseFailed(error) => {
                tracing::warn!(%error, "state file did not decode; keeping last snapshot");
                Vec::new()
            }
        }
    }

    /// Diff `snapshot` against the last applied one and update the registry.
    pub async fn apply_snapshot(&self, snapshot: StateSnapshot) -> Vec<SessionChange> {
        let mut guard = self.state.lock().await;
        if self.is_closed() {
            return Vec::new();
        }
        let EngineState { registry, store } = &mut *guard;

        let changes = diff_snapshots(store.current(), &snapshot, |id| registry.has_terminal(id));
        for change in &changes {
            match change.kind {
                ChangeKind::Removed => {
                    let discovered = registry
                        .get(&change.identifier)
                        .is_some_and(|r| !r.origin.is_local());
                    if discovered {
                        registry.remove(&change.identifier).await;
                    }
                }
                ChangeKind::Added | ChangeKind::Updated => {
                    let Some(payload) = snapshot.get(&change.identifier) else {
                        continue;
                    };
                    let id = match SessionId::parse(change.identifier.as_str()) {
                        Ok(id) => id,
                        Err(e) => {
                            tracing::warn!(error = %e, "skipping unsafe identifier");
                            continue;
                        }
                    };
                    let identity = resolve(id.as_str()).with_model_hint(payload.model_hint());
                    registry.upsert(id, identity, payload).await;
                }
            }
        }
        tracing::debug!(changes = changes.len(), sessions = snapshot.sessions.len(), "snapshot applied");
        store.replace(snapshot);
        changes
    }

    /// Reconcile against the multiplexer.
    ///
    /// Returns `Ok(None)` when another pass is already running or the engine
    /// has shut down.
    pub async fn reconcile(
        &self,
        intent: ReconcileIntent,
    ) -> Result<Option<ReconcileReport>, EngineError> {
        if self.reconciling.swap(true, Ordering::SeqCst) {
            tracing::info!("reconciliation already in progress, skipping");
            return Ok(None);
        }
        let _guard = ReconcileGuard(&self.reconciling);
        let mut state = self.state.lock().await;
        if self.is_closed() {
            tracing::debug!("engine closed, skipping reconciliation");
            return Ok(None);
        }
        self.reconcile_locked(&mut state, intent).await.map(Some)
    }

    async fn reconcile_locked(
        &self,
        state: &mut EngineState<P, N>,
        intent: ReconcileIntent,
    ) -> Result<ReconcileReport, EngineError> {
        if let Err(e) = state.store.load_from_disk().await {
            tracing::warn!(error = %e, "reconciling against last known state");
        }
        reconcile::reconcile(
            &self.sessions,
            self.config.ground_truth_timeout,
            &mut state.registry,
            &state.store,
            intent,
        )
        .await
    }

    /// Initial discovery with the configured intent.
    pub async fn startup(&self) -> Result<ReconcileReport, EngineError> {
        let intent = self.config.discovery;
        let report = self.reconcile(intent).await?.unwrap_or_default();
        if report.created > 0 {
            let body = match intent {
                ReconcileIntent::Passive => {
                    format!("Discovered {} active agent session(s)", report.created)
                }
                ReconcileIntent::Attach => {
                    format!("Attached to {} existing agent session(s)", report.created)
                }
            };
            let state = self.state.lock().await;
            state.registry.announce(Notice::info(NOTICE_TITLE, body)).await;
        }
        Ok(report)
    }

    /// One pass of trigger, stop-file and liveness monitoring.
    pub async fn monitor_tick(&self) {
        let mut state = self.state.lock().await;
        if self.is_closed() {
            return;
        }
        monitor::monitor_tick(&self.sessions, &self.clock, &self.config, &mut state.registry).await;
    }

    /// Process every pending command file. Returns how many were answered.
    pub async fn bridge_tick(&self) -> usize {
        if self.is_closed() {
            return 0;
        }
        let files = match self.bridge.pending().await {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(dir = %self.bridge.dir().display(), error = %e, "failed to list command directory");
                return 0;
            }
        };

        let mut answered = 0;
        for file in files {
            let text = match tokio::fs::read_to_string(&file).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(file = %file.display(), error = %e, "command file unreadable");
                    continue;
                }
            };
            let message = match BridgeCommand::parse(&text) {
                Ok(command) => {
                    tracing::info!(command = command.name(), file = %file.display(), "bridge command");
                    let mut state = self.state.lock().await;
                    if self.is_closed() {
                        break;
                    }
                    self.execute(&mut state, command).await
                }
                Err(e) => {
                    tracing::warn!(file = %file.display(), error = %e, "rejected command file");
                    e.to_string()
                }
            };
            match self.bridge.respond(&file, &message).await {
                Ok(()) => answered += 1,
                Err(e) => {
                    tracing::warn!(file = %file.display(), error = %e, "failed to write response")
                }
            }
        }
        answered
    }

    /// Dispose every record's resources. Passes that were waiting on the
    /// state lock become no-ops.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        self.closed.store(true, Ordering::SeqCst);
        let count = state.registry.len();
        state.registry.clear().await;
        tracing::info!(count, "registry cleared");
    }
}

#[cfg(test)]
#[path = "../engine_tests/mod.rs"]
mod tests;
