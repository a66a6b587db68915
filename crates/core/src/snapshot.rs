// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decoded contents of the external state file.
//!
//! ```json
//! { "last_updated": "...", "sessions": { "<id>": "busy" | { "state": "busy", "health": { "state": "dead" } } } }
//! ```

use crate::agent::ModelTier;
use crate::lifecycle::{HealthState, LifecycleState};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Errors decoding the state file.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("state file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One decode of the state file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub sessions: IndexMap<String, SessionPayload>,
}

impl StateSnapshot {
    pub fn parse(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn get(&self, id: &str) -> Option<&SessionPayload> {
        self.sessions.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Per-session payload: a bare state string or a detail object.
///
/// Anything else is kept verbatim as `Other` so structural comparison still
/// works, and decodes as state `unknown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionPayload {
    Bare(String),
    Detailed(PayloadDetail),
    Other(Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayloadDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionPayload {
    /// Nominal lifecycle state; missing or unrecognised values are `Unknown`.
    pub fn state(&self) -> LifecycleState {
        match self {
            SessionPayload::Bare(s) => LifecycleState::parse_lenient(s),
            SessionPayload::Detailed(detail) => detail
                .state
                .as_deref()
                .map(LifecycleState::parse_lenient)
                .unwrap_or(LifecycleState::Unknown),
            SessionPayload::Other(_) => LifecycleState::Unknown,
        }
    }

    /// Reported health; absent or unrecognised is `Healthy`.
    pub fn health(&self) -> HealthState {
        self.health_info()
            .and_then(|h| h.state.as_deref())
            .map(HealthState::parse_lenient)
            .unwrap_or_default()
    }

    /// State to present after the health override.
    pub fn effective_state(&self) -> LifecycleState {
        self.health().effective(self.state())
    }

    pub fn issues(&self) -> &[String] {
        self.health_info().map(|h| h.issues.as_slice()).unwrap_or(&[])
    }

    /// Model tier named by the payload, if any.
    pub fn model_hint(&self) -> Option<ModelTier> {
        match self {
            SessionPayload::Detailed(detail) => detail.model.as_deref()?.parse().ok(),
            _ => None,
        }
    }

    fn health_info(&self) -> Option<&HealthInfo> {
        match self {
            SessionPayload::Detailed(detail) => detail.health.as_ref(),
            _ => None,
        }
    }
}

impl From<LifecycleState> for SessionPayload {
    fn from(state: LifecycleState) -> Self {
        SessionPayload::Bare(state.as_str().to_string())
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
