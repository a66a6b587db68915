// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use mw_adapters::{PresentationError, SessionError};
use mw_core::{InvalidSessionId, LifecycleState, SnapshotError, UnknownName};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from registry mutations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("terminal already registered as agent: {0}")]
    AlreadyAttached(String),
    #[error("session {id} is {state}; no further transitions")]
    Absorbing { id: String, state: LifecycleState },
}

/// Errors loading the state file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed state file: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Errors surfaced by engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Presentation(#[from] PresentationError),
    #[error(transparent)]
    InvalidSessionId(#[from] InvalidSessionId),
    #[error(transparent)]
    UnknownName(#[from] UnknownName),
    #[error("ground truth query timed out after {0}ms")]
    GroundTruthTimeout(u64),
    #[error("bridge I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
