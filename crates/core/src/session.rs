// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multiplexer session identifiers.
//!
//! A `SessionId` is the only way an identifier reaches an externally executed
//! command. Construction validates against `^[A-Za-z0-9_.-]{1,99}$`; there is
//! no unchecked constructor and no normalisation of rejected input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static VALID_SESSION_ID: LazyLock<regex::Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    regex::Regex::new(r"^[A-Za-z0-9_.\-]{1,99}$").expect("constant regex pattern is valid")
});

/// Identifier rejected by session-id validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid session identifier: {0:?}")]
pub struct InvalidSessionId(pub String);

/// A validated multiplexer session name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Validate `raw` as a session identifier.
    pub fn parse(raw: impl Into<String>) -> Result<Self, InvalidSessionId> {
        let raw = raw.into();
        if Self::is_valid(&raw) {
            Ok(Self(raw))
        } else {
            Err(InvalidSessionId(raw))
        }
    }

    /// Whether `raw` would be accepted by [`SessionId::parse`].
    pub fn is_valid(raw: &str) -> bool {
        VALID_SESSION_ID.is_match(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SessionId {
    type Error = InvalidSessionId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for SessionId {
    type Error = InvalidSessionId;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SessionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SessionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
