// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ground-truth reconciliation
//!
//! Brings the registry back in line with the multiplexer: a session survives
//! only if it is alive and, when listed in the state file, not reported dead.

use crate::error::EngineError;
use crate::registry::SessionRegistry;
use crate::store::SessionStateStore;
use indexmap::IndexMap;
use mw_adapters::{NotifyAdapter, PresentationAdapter, SessionAdapter};
use mw_core::{resolve, HealthState, SessionId, SessionPayload};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

/// What newly discovered sessions get.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileIntent {
    /// Status item only
    #[default]
    Passive,
    /// Status item and a terminal
    Attach,
}

/// Outcome of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Records that were already tracked and survived
    pub kept: usize,
    /// Records created for sessions not yet tracked
    pub created: usize,
    /// Records removed
    pub dropped: usize,
}

/// Query the multiplexer, bounded by `timeout`.
pub(crate) async fn alive_sessions<S: SessionAdapter>(
    sessions: &S,
    timeout: Duration,
) -> Result<HashSet<String>, EngineError> {
    match tokio::time::timeout(timeout, sessions.list_sessions()).await {
        Ok(Ok(names)) => Ok(names.into_iter().collect()),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(EngineError::GroundTruthTimeout(timeout.as_millis() as u64)),
    }
}

/// Run one pass against `store`'s current snapshot.
///
/// A ground-truth failure aborts before anything is touched.
pub(crate) async fn reconcile<S, P, N>(
    sessions: &S,
    timeout: Duration,
    registry: &mut SessionRegistry<P, N>,
    store: &SessionStateStore,
    intent: ReconcileIntent,
) -> Result<ReconcileReport, EngineError>
where
    S: SessionAdapter,
    P: PresentationAdapter,
    N: NotifyAdapter,
{
    let alive = alive_sessions(sessions, timeout).await?;

    let survivors: IndexMap<SessionId, &SessionPayload> = store
        .current()
        .sessions
        .iter()
        .filter(|(id, payload)| alive.contains(id.as_str()) && payload.health() != HealthState::Dead)
        .filter_map(|(id, payload)| match SessionId::parse(id.as_str()) {
            Ok(sid) => Some((sid, payload)),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unsafe identifier");
                None
            }
        })
        .collect();

    let mut report = ReconcileReport::default();
    for id in registry.ids() {
        let listed_dead = store
            .current()
            .sessions
            .get(id.as_str())
            .is_some_and(|payload| payload.health() == HealthState::Dead);
        let keep = registry.get(id.as_str()).is_some_and(|record| {
            if record.state.is_absorbing() || listed_dead {
                return false;
            }
            survivors.contains_key(id.as_str())
                || (record.origin.is_local() && alive.contains(id.as_str()))
        });
        if keep {
            report.kept += 1;
        } else {
            registry.remove(id.as_str()).await;
            report.dropped += 1;
        }
    }

    for (id, payload) in survivors {
        let is_new = !registry.contains(id.as_str());
        let identity = resolve(id.as_str()).with_model_hint(payload.model_hint());
        registry.upsert(id.clone(), identity, payload).await;
        if is_new {
            report.created += 1;
            if intent == ReconcileIntent::Attach {
                registry.attach_terminal(id.as_str()).await;
            }
        }
    }

    tracing::info!(
        alive = alive.len(),
        kept = report.kept,
        created = report.created,
        dropped = report.dropped,
        "reconciled"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
