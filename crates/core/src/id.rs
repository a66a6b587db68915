// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal identifiers minted by presentation adapters

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identifier of a presentation resource (terminal).
///
/// Opaque and adapter-minted; never passed to external commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerminalId(String);

impl TerminalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for TerminalId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Mints `{prefix}-1`, `{prefix}-2`, ...; clones share the counter.
#[derive(Debug, Clone)]
pub struct TerminalIdGen {
    prefix: Arc<str>,
    counter: Arc<AtomicU64>,
}

impl TerminalIdGen {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: Arc::from(prefix),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn next(&self) -> TerminalId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        TerminalId(format!("{}-{n}", self.prefix))
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
