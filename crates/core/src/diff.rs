// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session-by-session diff of two state snapshots.

use crate::snapshot::StateSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Updated,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionChange {
    pub identifier: String,
    pub kind: ChangeKind,
}

impl SessionChange {
    fn new(identifier: &str, kind: ChangeKind) -> Self {
        Self {
            identifier: identifier.to_string(),
            kind,
        }
    }
}

/// Compute the changes from `prev` to `next`.
///
/// Removals come first, then entries of `next` in file order. An identifier
/// that owns a terminal (`has_terminal`) is always reported as updated, even
/// when its payload is unchanged, so its title is re-rendered.
pub fn diff_snapshots(
    prev: &StateSnapshot,
    next: &StateSnapshot,
    has_terminal: impl Fn(&str) -> bool,
) -> Vec<SessionChange> {
    let mut changes: Vec<SessionChange> = prev
        .sessions
        .keys()
        .filter(|id| !next.sessions.contains_key(id.as_str()))
        .map(|id| SessionChange::new(id, ChangeKind::Removed))
        .collect();

    for (id, payload) in &next.sessions {
        match prev.sessions.get(id) {
            None => changes.push(SessionChange::new(id, ChangeKind::Added)),
            Some(old) if old != payload || has_terminal(id.as_str()) => {
                changes.push(SessionChange::new(id, ChangeKind::Updated))
            }
            Some(_) => {}
        }
    }

    changes
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
