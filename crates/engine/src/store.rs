// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Last known-good contents of the external state file.

use crate::error::StoreError;
use mw_core::StateSnapshot;
use std::path::{Path, PathBuf};

/// Holds the most recent successfully decoded snapshot.
///
/// This is also the "previous snapshot" the diff runs against, so it is only
/// ever replaced by a snapshot that decoded cleanly.
#[derive(Debug)]
pub struct SessionStateStore {
    path: PathBuf,
    current: StateSnapshot,
}

impl SessionStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: StateSnapshot::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> &StateSnapshot {
        &self.current
    }

    /// Install a new snapshot, returning the one it replaces.
    pub fn replace(&mut self, snapshot: StateSnapshot) -> StateSnapshot {
        std::mem::replace(&mut self.current, snapshot)
    }

    /// Re-read the file. A missing file or a decode failure leaves the
    /// current snapshot untouched.
    pub async fn load_from_disk(&mut self) -> Result<&StateSnapshot, StoreError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "state file absent");
                return Ok(&self.current);
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        self.current = StateSnapshot::parse(&text)?;
        Ok(&self.current)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
