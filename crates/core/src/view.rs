// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Presentation view model rendered from a session record.

use crate::identity::Identity;
use crate::lifecycle::{HealthState, LifecycleState, StatusEmphasis};
use crate::session::SessionId;
use std::path::Path;

/// Inputs needed to render a session.
#[derive(Debug, Clone, Copy)]
pub struct ViewSource<'a> {
    pub session_id: &'a SessionId,
    pub identity: &'a Identity,
    pub display_name: &'a str,
    /// Nominal state; the health override is applied during rendering.
    pub state: LifecycleState,
    pub health: HealthState,
    pub issues: &'a [String],
    pub cwd: Option<&'a Path>,
}

/// Everything a presentation sink needs to draw one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub session_id: SessionId,
    /// Terminal title: `{emoji} {stateIcon} {displayName}`.
    pub title: String,
    /// Compact status text: `{emoji}{suffix}`.
    pub status_text: String,
    pub tooltip: String,
    /// Theme colour; `None` for non-agent sessions.
    pub color: Option<&'static str>,
    pub emphasis: StatusEmphasis,
    /// State after the health override.
    pub state: LifecycleState,
}

impl SessionView {
    pub fn render(src: &ViewSource<'_>) -> Self {
        let state = src.health.effective(src.state);
        let emoji = src.identity.emoji();
        let suffix = src
            .display_name
            .rsplit('-')
            .next()
            .unwrap_or(src.display_name);
        let kind_name = src
            .identity
            .kind()
            .map(|k| k.name())
            .unwrap_or("other");

        let mut title = format!("{} {} {}", emoji, state.icon(), src.display_name);
        if let Some(badge) = src.identity.agent().and_then(|id| id.model?.badge()) {
            title.push(' ');
            title.push_str(badge);
        }

        let mut tooltip = format!(
            "Agent: {}\nSession: {}\nState: {}",
            kind_name, src.session_id, state
        );
        if src.health != HealthState::Healthy || !src.issues.is_empty() {
            tooltip.push_str(&format!("\nHealth: {}", src.health));
            if !src.issues.is_empty() {
                tooltip.push_str(&format!(" ({})", src.issues.join(", ")));
            }
        }
        if let Some(cwd) = src.cwd {
            tooltip.push_str(&format!("\nDirectory: {}", cwd.display()));
        }

        Self {
            session_id: src.session_id.clone(),
            title,
            status_text: format!("{emoji}{suffix}"),
            tooltip,
            color: src.identity.kind().map(|k| k.color()),
            emphasis: state.emphasis(),
            state,
        }
    }
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
