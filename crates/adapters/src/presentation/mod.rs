// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Presentation adapters: terminals and status indicators
//!
//! A terminal is an exclusively owned UI resource. [`TerminalHandle`] is not
//! `Clone`, and disposing consumes it.

mod noop;
mod tmux;

pub use noop::NoOpPresentationAdapter;
pub use tmux::TmuxPresentation;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePresentationAdapter, PresentationCall};

use async_trait::async_trait;
use mw_core::{SessionId, SessionView, TerminalId};
use thiserror::Error;

/// Errors from presentation operations
#[derive(Debug, Error)]
pub enum PresentationError {
    #[error("terminal unavailable for {0}")]
    Unavailable(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("status file write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Owned reference to a terminal created for a session.
#[derive(Debug, PartialEq, Eq)]
pub struct TerminalHandle {
    id: TerminalId,
    session_id: SessionId,
}

impl TerminalHandle {
    pub fn new(id: TerminalId, session_id: SessionId) -> Self {
        Self { id, session_id }
    }

    pub fn id(&self) -> &TerminalId {
        &self.id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }
}

/// Sink for session presentation.
#[async_trait]
pub trait PresentationAdapter: Clone + Send + Sync + 'static {
    /// Create a terminal attached to the view's session
    async fn create_terminal(&self, view: &SessionView) -> Result<TerminalHandle, PresentationError>;

    /// Re-render an existing terminal (title, colours)
    async fn update_terminal(
        &self,
        handle: &TerminalHandle,
        view: &SessionView,
    ) -> Result<(), PresentationError>;

    /// Release a terminal
    async fn dispose_terminal(&self, handle: TerminalHandle) -> Result<(), PresentationError>;

    /// Show or refresh the status indicator for a session
    async fn show_status(&self, view: &SessionView) -> Result<(), PresentationError>;

    /// Remove the status indicator for a session; idempotent
    async fn hide_status(&self, id: &SessionId) -> Result<(), PresentationError>;
}
