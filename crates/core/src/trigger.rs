// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger and stop file grammar.
//!
//! - trigger: `state:timestamp[:displayName]`
//! - legacy stop: `STOP:timestamp:session:state` (state defaults to `done`)

use crate::lifecycle::LifecycleState;
use std::fmt;

/// States an external actor may request through a signal file.
fn signalable(raw: &str) -> Option<LifecycleState> {
    match LifecycleState::parse_strict(raw)? {
        LifecycleState::Stopped => None,
        state => Some(state),
    }
}

/// Parsed `<session>.trigger` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerSignal {
    pub state: LifecycleState,
    pub timestamp: String,
    /// Replacement display name.
    pub display_name: Option<String>,
}

impl TriggerSignal {
    pub fn new(state: LifecycleState, timestamp: impl Into<String>) -> Self {
        Self {
            state,
            timestamp: timestamp.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Parse trigger content; `None` when the state is not recognised.
    pub fn parse(content: &str) -> Option<Self> {
        let mut parts = content.trim().split(':');
        let state = signalable(parts.next()?)?;
        let timestamp = parts.next().unwrap_or_default().to_string();
        let display_name = parts
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        Some(Self {
            state,
            timestamp,
            display_name,
        })
    }
}

impl fmt::Display for TriggerSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.state, self.timestamp)?;
        if let Some(name) = &self.display_name {
            write!(f, ":{name}")?;
        }
        Ok(())
    }
}

/// Parsed legacy `<session>.stop` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopSignal {
    pub timestamp: Option<String>,
    pub session: Option<String>,
    pub state: LifecycleState,
}

impl StopSignal {
    /// Parse stop content. Never fails: a missing or unrecognised state is `done`.
    pub fn parse(content: &str) -> Self {
        let parts: Vec<&str> = content.trim().split(':').collect();
        let field = |i: usize| {
            parts
                .get(i)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };
        Self {
            timestamp: field(1),
            session: field(2),
            state: parts
                .get(3)
                .and_then(|s| signalable(s))
                .unwrap_or(LifecycleState::Done),
        }
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
