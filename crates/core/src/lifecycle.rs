// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle and health states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-session lifecycle state.
///
/// `Terminated` and `Stopped` are absorbing: once reached no transition leaves
/// them. Unrecognised state strings decode as `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    #[default]
    Idle,
    Busy,
    Done,
    Error,
    Terminated,
    Stopped,
    #[serde(other)]
    Unknown,
}

/// How strongly a status indicator should draw attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEmphasis {
    None,
    Warning,
    Prominent,
    Error,
}

impl LifecycleState {
    /// Parse a state string; anything unrecognised becomes `Unknown`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "idle" => LifecycleState::Idle,
            "busy" => LifecycleState::Busy,
            "done" => LifecycleState::Done,
            "error" => LifecycleState::Error,
            "terminated" => LifecycleState::Terminated,
            "stopped" => LifecycleState::Stopped,
            _ => LifecycleState::Unknown,
        }
    }

    /// Strict parse for operator input, where a typo should be an error.
    pub fn parse_strict(raw: &str) -> Option<Self> {
        match Self::parse_lenient(raw) {
            LifecycleState::Unknown if !raw.trim().eq_ignore_ascii_case("unknown") => None,
            state => Some(state),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Busy => "busy",
            LifecycleState::Done => "done",
            LifecycleState::Error => "error",
            LifecycleState::Unknown => "unknown",
            LifecycleState::Terminated => "terminated",
            LifecycleState::Stopped => "stopped",
        }
    }

    /// Whether the state ends monitoring for the session.
    pub fn is_absorbing(self) -> bool {
        matches!(self, LifecycleState::Terminated | LifecycleState::Stopped)
    }

    /// Whether entering this state raises a user notification.
    pub fn is_notable(self) -> bool {
        matches!(
            self,
            LifecycleState::Done | LifecycleState::Error | LifecycleState::Terminated
        )
    }

    /// Whether `self -> next` is permitted.
    ///
    /// Any state may move anywhere except out of an absorbing state. There is
    /// no implicit reset: leaving `done` requires an explicit signal.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        !self.is_absorbing() || self == next
    }

    /// Title icon.
    pub fn icon(self) -> &'static str {
        match self {
            LifecycleState::Idle => "⚪",
            LifecycleState::Busy => "🔵",
            LifecycleState::Done => "🟢",
            LifecycleState::Error => "❌",
            LifecycleState::Unknown => "❓",
            LifecycleState::Terminated | LifecycleState::Stopped => "🛑",
        }
    }

    /// Compact single-glyph indicator.
    pub fn indicator(self) -> char {
        match self {
            LifecycleState::Idle => '○',
            LifecycleState::Busy => '●',
            LifecycleState::Done => '✓',
            LifecycleState::Error => '✗',
            LifecycleState::Unknown => '?',
            LifecycleState::Terminated => '×',
            LifecycleState::Stopped => '■',
        }
    }

    pub fn emphasis(self) -> StatusEmphasis {
        match self {
            LifecycleState::Idle => StatusEmphasis::Warning,
            LifecycleState::Busy => StatusEmphasis::Prominent,
            LifecycleState::Done
            | LifecycleState::Error
            | LifecycleState::Stopped
            | LifecycleState::Terminated => StatusEmphasis::Error,
            LifecycleState::Unknown => StatusEmphasis::None,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health reported alongside a session's state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Interrupted,
    Dead,
    #[default]
    #[serde(other)]
    Healthy,
}

impl HealthState {
    /// Parse a health string; anything unrecognised is `Healthy`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dead" => HealthState::Dead,
            "interrupted" => HealthState::Interrupted,
            _ => HealthState::Healthy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthState::Healthy => "healthy",
            HealthState::Interrupted => "interrupted",
            HealthState::Dead => "dead",
        }
    }

    /// Lifecycle state to display given the nominal one.
    ///
    /// `Dead` forces `Terminated`; `Interrupted` is metadata only.
    pub fn effective(self, nominal: LifecycleState) -> LifecycleState {
        match self {
            HealthState::Dead => LifecycleState::Terminated,
            HealthState::Healthy | HealthState::Interrupted => nominal,
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
