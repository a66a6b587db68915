// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent catalogue: kinds and model tiers.
//!
//! Every per-kind attribute lives in one exhaustive match so adding a kind is
//! checked by the compiler.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of long-running agent process a session represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Architect,
    Featplanner,
    Planner,
    Factory,
    Qa,
    Weaver,
    Security,
    Darkwingduck,
}

/// Static attributes of an agent kind.
struct KindInfo {
    name: &'static str,
    emoji: &'static str,
    code: &'static str,
    color: &'static str,
}

impl AgentKind {
    /// All kinds in launch-order priority.
    pub const ALL: [AgentKind; 8] = [
        AgentKind::Architect,
        AgentKind::Featplanner,
        AgentKind::Planner,
        AgentKind::Factory,
        AgentKind::Qa,
        AgentKind::Weaver,
        AgentKind::Security,
        AgentKind::Darkwingduck,
    ];

    fn info(self) -> KindInfo {
        let (name, emoji, code, color) = match self {
            AgentKind::Architect => ("architect", "🏗️", "AR", "magenta"),
            AgentKind::Featplanner => ("featplanner", "✨", "FP", "brightmagenta"),
            AgentKind::Planner => ("planner", "📋", "PL", "blue"),
            AgentKind::Factory => ("factory", "🏭", "FA", "green"),
            AgentKind::Qa => ("qa", "🔍", "QA", "yellow"),
            AgentKind::Weaver => ("weaver", "🕸️", "WE", "cyan"),
            AgentKind::Security => ("security", "🛡️", "SE", "red"),
            AgentKind::Darkwingduck => ("darkwingduck", "🦆", "DD", "white"),
        };
        KindInfo {
            name,
            emoji,
            code,
            color,
        }
    }

    /// Lowercase name used in session identifiers (`factory`).
    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn emoji(self) -> &'static str {
        self.info().emoji
    }

    /// Two-letter short code (`FA`).
    pub fn short_code(self) -> &'static str {
        self.info().code
    }

    /// Multiplexer theme colour.
    pub fn color(self) -> &'static str {
        self.info().color
    }

    /// Reverse lookup from a two-letter short code (case-sensitive).
    pub fn from_short_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.short_code() == code)
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for unrecognised kind or tier names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what}: {value}")]
pub struct UnknownName {
    pub what: &'static str,
    pub value: String,
}

impl FromStr for AgentKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| UnknownName {
                what: "agent kind",
                value: s.to_string(),
            })
    }
}

/// Model tier an agent runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    #[default]
    Sonnet,
    Opus,
    Haiku,
}

impl ModelTier {
    pub const ALL: [ModelTier; 3] = [ModelTier::Sonnet, ModelTier::Opus, ModelTier::Haiku];

    pub fn name(self) -> &'static str {
        match self {
            ModelTier::Sonnet => "sonnet",
            ModelTier::Opus => "opus",
            ModelTier::Haiku => "haiku",
        }
    }

    /// One-letter indicator used in display names.
    pub fn letter(self) -> char {
        match self {
            ModelTier::Sonnet => 'S',
            ModelTier::Opus => 'O',
            ModelTier::Haiku => 'H',
        }
    }

    /// Badge shown next to non-default tiers.
    pub fn badge(self) -> Option<&'static str> {
        match self {
            ModelTier::Sonnet => None,
            ModelTier::Opus => Some("👑"),
            ModelTier::Haiku => Some("⚡"),
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.letter() == letter)
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelTier {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == lower)
            .ok_or_else(|| UnknownName {
                what: "model tier",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
