// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{LifecycleState, SessionId, SessionPayload, StateSnapshot};

/// Valid session id; panics on invalid input.
#[allow(clippy::expect_used)]
pub fn sid(raw: &str) -> SessionId {
    SessionId::parse(raw).expect("test session id is valid")
}

/// Snapshot with bare state payloads.
pub fn snapshot(entries: &[(&str, LifecycleState)]) -> StateSnapshot {
    StateSnapshot {
        last_updated: None,
        sessions: entries
            .iter()
            .map(|(id, state)| (id.to_string(), SessionPayload::from(*state)))
            .collect(),
    }
}

/// Snapshot parsed from JSON; panics on invalid input.
#[allow(clippy::expect_used)]
pub fn snapshot_json(json: &str) -> StateSnapshot {
    StateSnapshot::parse(json).expect("test snapshot is valid JSON")
}
