// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session monitoring of trigger files, stop files, and liveness.
//!
//! Each tick checks, in order, and acts on the first hit:
//! 1. `<trigger_dir>/<session>.trigger`
//! 2. `<trigger_dir>/<displayName>.trigger`
//! 3. `<hooks_dir>/<session>.stop`
//! 4. multiplexer liveness
//!
//! Signal files are consumed (deleted) once read. Monitoring of a session
//! ends once it reaches an absorbing state or the monitor cap elapses.

use crate::config::EngineConfig;
use crate::registry::SessionRegistry;
use mw_adapters::{NotifyAdapter, PresentationAdapter, SessionAdapter};
use mw_core::{Clock, LifecycleState, SessionId, StopSignal, TriggerSignal};
use std::path::{Path, PathBuf};

/// Normalized monitor observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorSignal {
    Trigger(TriggerSignal),
    Stop(StopSignal),
    /// The multiplexer no longer has the session
    Gone,
}

impl MonitorSignal {
    pub fn state(&self) -> LifecycleState {
        match self {
            MonitorSignal::Trigger(t) => t.state,
            MonitorSignal::Stop(s) => s.state,
            MonitorSignal::Gone => LifecycleState::Terminated,
        }
    }
}

/// `<dir>/<name>.<ext>`, or `None` when `name` is not a plain file name.
fn signal_path(dir: &Path, name: &str, ext: &str) -> Option<PathBuf> {
    if name.is_empty() || name.contains(|c: char| c == '/' || c == '\\') || name.starts_with('.') {
        return None;
    }
    Some(dir.join(format!("{name}.{ext}")))
}

/// Read and delete a signal file. Absent or unreadable files yield `None`.
async fn take_file(path: &Path) -> Option<String> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "signal file unreadable");
            return None;
        }
    };
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::debug!(path = %path.display(), error = %e, "failed to remove signal file");
    }
    Some(content)
}

async fn take_trigger(path: Option<PathBuf>) -> Option<TriggerSignal> {
    let path = path?;
    let content = take_file(&path).await?;
    let signal = TriggerSignal::parse(&content);
    if signal.is_none() {
        tracing::warn!(path = %path.display(), content = content.trim(), "ignoring invalid trigger");
    }
    signal
}

/// Poll the signal sources for one session.
pub(crate) async fn poll_signal<S: SessionAdapter>(
    sessions: &S,
    config: &EngineConfig,
    id: &SessionId,
    display_name: &str,
) -> Option<MonitorSignal> {
    let by_session = signal_path(&config.trigger_dir, id.as_str(), "trigger");
    if let Some(signal) = take_trigger(by_session).await {
        return Some(MonitorSignal::Trigger(signal));
    }

    if display_name != id.as_str() {
        let by_display = signal_path(&config.trigger_dir, display_name, "trigger");
        if let Some(mut signal) = take_trigger(by_display).await {
            signal.display_name = None;
            return Some(MonitorSignal::Trigger(signal));
        }
    }

    if let Some(path) = signal_path(&config.hooks_dir, id.as_str(), "stop") {
        if let Some(content) = take_file(&path).await {
            return Some(MonitorSignal::Stop(StopSignal::parse(&content)));
        }
    }

    match sessions.is_alive(id).await {
        Ok(true) => None,
        Ok(false) => Some(MonitorSignal::Gone),
        Err(e) => {
            tracing::debug!(session_id = %id, error = %e, "liveness check failed");
            None
        }
    }
}

/// Run one monitoring pass over every monitored record.
pub(crate) async fn monitor_tick<S, P, N, C>(
    sessions: &S,
    clock: &C,
    config: &EngineConfig,
    registry: &mut SessionRegistry<P, N>,
) where
    S: SessionAdapter,
    P: PresentationAdapter,
    N: NotifyAdapter,
    C: Clock,
{
    for id in registry.monitored() {
        let Some(record) = registry.get(id.as_str()) else {
            continue;
        };
        if record.state.is_absorbing() {
            tracing::debug!(session_id = %id, state = %record.state, "monitoring finished");
            registry.stop_monitoring(id.as_str());
            continue;
        }
        let expired = record
            .monitor_since
            .is_some_and(|since| clock.now().saturating_duration_since(since) >= config.monitor_cap);
        if expired {
            tracing::info!(session_id = %id, "monitoring window elapsed");
            registry.stop_monitoring(id.as_str());
            continue;
        }

        let display = record.display_name();
        let Some(signal) = poll_signal(sessions, config, &id, &display).await else {
            continue;
        };
        tracing::debug!(session_id = %id, ?signal, "monitor signal");

        if let MonitorSignal::Trigger(TriggerSignal {
            display_name: Some(name),
            ..
        }) = &signal
        {
            registry.set_display_name(id.as_str(), name).await;
        }
        if let Err(e) = registry.transition(id.as_str(), signal.state()).await {
            tracing::debug!(session_id = %id, error = %e, "monitor transition skipped");
        }
        if signal.state().is_absorbing() {
            registry.stop_monitoring(id.as_str());
        }
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
