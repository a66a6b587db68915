// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity resolution: raw session identifiers to typed agent identities,
//! and canonical display names.
//!
//! Resolution order (first match wins):
//! 1. logical name `XX-M-...` (short code + model letter)
//! 2. full kind prefix `<kind>-` (case-insensitive)
//! 3. legacy short code prefix followed by `-`, `_`, a digit, or the end
//! 4. otherwise the session is `Other`
//!
//! The remainder after the prefix is classified as a task id first, then as a
//! phonetic token, else kept as an opaque suffix.

use crate::agent::{AgentKind, ModelTier};
use serde::Serialize;
use std::sync::LazyLock;

/// Mnemonic words used to name sessions spawned without a task id.
pub const PHONETIC_ALPHABET: [&str; 26] = [
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india", "juliet",
    "kilo", "lima", "mike", "november", "oscar", "papa", "quebec", "romeo", "sierra", "tango",
    "uniform", "victor", "whiskey", "xray", "yankee", "zulu",
];

/// Longest display name ever produced.
pub const MAX_DISPLAY_NAME_LEN: usize = 10;

macro_rules! regex {
    ($pat:expr) => {
        LazyLock::new(|| {
            #[allow(clippy::expect_used)]
            regex::Regex::new($pat).expect("constant regex pattern is valid")
        })
    };
}

static LOGICAL_NAME: LazyLock<regex::Regex> = regex!(r"^([A-Z]{2})-([SOH])-(.*)$");
static TASK_ID: LazyLock<regex::Regex> =
    regex!(r"^(?:TC-\d+|DC-\d+|\d+-TS-.+|[A-Z]{2}-\d+|\d{3})$");
static TS_TASK: LazyLock<regex::Regex> = regex!(r"^(\d+)-TS-");
static CODED_TASK: LazyLock<regex::Regex> = regex!(r"^[A-Z]{2}-(\d+)$");
static TRAILING_DIGITS: LazyLock<regex::Regex> = regex!(r"(\d{3,})$");

/// Typed identity of an agent session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedIdentity {
    pub kind: AgentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    /// Remainder that is neither a task id nor a phonetic token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Tier encoded in the identifier or supplied explicitly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelTier>,
}

impl ResolvedIdentity {
    /// Identity built from caller-supplied fields (spawn/register).
    pub fn explicit(kind: AgentKind, task_id: Option<String>, model: Option<ModelTier>) -> Self {
        let mut identity = Self {
            kind,
            task_id: None,
            phonetic: None,
            suffix: None,
            model,
        };
        if let Some(task) = task_id.filter(|t| !t.is_empty()) {
            identity.classify_remainder(&task);
            // A caller-supplied task is authoritative even if it does not look like one.
            if identity.task_id.is_none() && identity.phonetic.is_none() {
                identity.task_id = identity.suffix.take();
            }
        }
        identity
    }

    fn from_remainder(kind: AgentKind, model: Option<ModelTier>, remainder: &str) -> Self {
        let mut identity = Self {
            kind,
            task_id: None,
            phonetic: None,
            suffix: None,
            model,
        };
        identity.classify_remainder(remainder);
        identity
    }

    fn classify_remainder(&mut self, remainder: &str) {
        if remainder.is_empty() {
            return;
        }
        if TASK_ID.is_match(remainder) {
            self.task_id = Some(remainder.to_string());
        } else if is_phonetic(remainder) {
            self.phonetic = Some(remainder.to_ascii_lowercase());
        } else {
            self.suffix = Some(remainder.to_string());
        }
    }

    /// Tier to display, defaulting to sonnet.
    pub fn model_or_default(&self) -> ModelTier {
        self.model.unwrap_or_default()
    }

    /// Source for the display-name suffix: task id, else phonetic token.
    pub fn suffix_source(&self) -> Option<&str> {
        self.task_id.as_deref().or(self.phonetic.as_deref())
    }

    pub fn display_name(&self, session_id: &str) -> String {
        display_name(
            session_id,
            self.kind,
            self.model_or_default(),
            self.suffix_source(),
        )
    }
}

/// Result of resolving a session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Identity {
    Agent(ResolvedIdentity),
    /// Monitorable, but outside the agent naming scheme.
    Other,
}

impl Identity {
    pub fn agent(&self) -> Option<&ResolvedIdentity> {
        match self {
            Identity::Agent(id) => Some(id),
            Identity::Other => None,
        }
    }

    pub fn kind(&self) -> Option<AgentKind> {
        self.agent().map(|id| id.kind)
    }

    /// Fill in the model tier from sidecar data when the identifier has none.
    pub fn with_model_hint(mut self, hint: Option<ModelTier>) -> Self {
        if let (Identity::Agent(id), Some(hint)) = (&mut self, hint) {
            id.model.get_or_insert(hint);
        }
        self
    }

    /// Display name; `Other` sessions display their identifier.
    pub fn display_name(&self, session_id: &str) -> String {
        match self {
            Identity::Agent(id) => id.display_name(session_id),
            Identity::Other => session_id.to_string(),
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Identity::Agent(id) => id.kind.emoji(),
            Identity::Other => "📟",
        }
    }
}

fn is_phonetic(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    PHONETIC_ALPHABET.contains(&lower.as_str())
}

/// Resolve a raw session identifier into an identity.
pub fn resolve(raw: &str) -> Identity {
    if let Some(caps) = LOGICAL_NAME.captures(raw) {
        let kind = AgentKind::from_short_code(&caps[1]);
        let model = caps[2].chars().next().and_then(ModelTier::from_letter);
        if let (Some(kind), Some(model)) = (kind, model) {
            return Identity::Agent(ResolvedIdentity::from_remainder(
                kind,
                Some(model),
                &caps[3],
            ));
        }
    }

    let lower = raw.to_ascii_lowercase();
    for kind in AgentKind::ALL {
        let prefix = format!("{}-", kind.name());
        if lower.starts_with(&prefix) {
            return Identity::Agent(ResolvedIdentity::from_remainder(
                kind,
                None,
                &raw[prefix.len()..],
            ));
        }
    }

    if let Some(identity) = resolve_legacy_code(raw) {
        return Identity::Agent(identity);
    }

    Identity::Other
}

fn resolve_legacy_code(raw: &str) -> Option<ResolvedIdentity> {
    let head = raw.get(..2)?;
    let kind = AgentKind::from_short_code(&head.to_ascii_uppercase())?;
    let rest = &raw[2..];
    let remainder = match rest.chars().next() {
        None => "",
        Some('-') | Some('_') => &rest[1..],
        Some(c) if c.is_ascii_digit() => rest,
        Some(_) => return None,
    };
    Some(ResolvedIdentity::from_remainder(kind, None, remainder))
}

/// Canonical display name `{code}-{modelLetter}-{suffix}`, at most 10 chars.
///
/// `suffix_source` is the task id or phonetic token. Without one the suffix is
/// derived from the session identifier (last 3 of a trailing digit run, else
/// its last 3 characters).
pub fn display_name(
    session_id: &str,
    kind: AgentKind,
    model: ModelTier,
    suffix_source: Option<&str>,
) -> String {
    let suffix = match suffix_source.filter(|s| !s.is_empty()) {
        Some(source) => suffix_from_source(source),
        None => suffix_from_session(session_id),
    };
    let full = format!("{}-{}-{}", kind.short_code(), model.letter(), suffix);
    full.chars().take(MAX_DISPLAY_NAME_LEN).collect()
}

fn suffix_from_source(source: &str) -> String {
    if let Some(caps) = TS_TASK.captures(source) {
        return caps[1].to_string();
    }
    if let Some(caps) = CODED_TASK.captures(source) {
        return caps[1].to_string();
    }
    let len = source.chars().count();
    if len > 8 {
        source.chars().take(3).collect()
    } else {
        source.to_string()
    }
}

fn suffix_from_session(session_id: &str) -> String {
    if let Some(caps) = TRAILING_DIGITS.captures(session_id) {
        let digits = &caps[1];
        return digits[digits.len() - 3..].to_string();
    }
    let chars: Vec<char> = session_id.chars().collect();
    chars[chars.len().saturating_sub(3)..].iter().collect()
}

/// First phonetic word not in `taken`, else `{word}{n}` for the smallest free n.
pub fn next_phonetic_token<'a>(taken: impl IntoIterator<Item = &'a str>) -> String {
    let taken: Vec<String> = taken.into_iter().map(str::to_ascii_lowercase).collect();
    let is_free = |candidate: &str| !taken.iter().any(|t| t == candidate);

    if let Some(word) = PHONETIC_ALPHABET.iter().find(|w| is_free(w)) {
        return (*word).to_string();
    }
    (2u32..)
        .flat_map(|n| PHONETIC_ALPHABET.iter().map(move |w| format!("{w}{n}")))
        .find(|candidate| is_free(candidate))
        .unwrap_or_else(|| PHONETIC_ALPHABET[0].to_string())
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
