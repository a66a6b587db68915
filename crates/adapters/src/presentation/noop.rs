// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Headless presentation adapter.

use super::{PresentationAdapter, PresentationError, TerminalHandle};
use async_trait::async_trait;
use mw_core::{SessionId, SessionView, TerminalIdGen};

/// Presentation adapter that draws nothing but still hands out handles.
#[derive(Clone)]
pub struct NoOpPresentationAdapter {
    ids: TerminalIdGen,
}

impl NoOpPresentationAdapter {
    pub fn new() -> Self {
        Self {
            ids: TerminalIdGen::new("noop"),
        }
    }
}

impl Default for NoOpPresentationAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PresentationAdapter for NoOpPresentationAdapter {
    async fn create_terminal(&self, view: &SessionView) -> Result<TerminalHandle, PresentationError> {
        Ok(TerminalHandle::new(
            self.ids.next(),
            view.session_id.clone(),
        ))
    }

    async fn update_terminal(
        &self,
        _handle: &TerminalHandle,
        _view: &SessionView,
    ) -> Result<(), PresentationError> {
        Ok(())
    }

    async fn dispose_terminal(&self, _handle: TerminalHandle) -> Result<(), PresentationError> {
        Ok(())
    }

    async fn show_status(&self, _view: &SessionView) -> Result<(), PresentationError> {
        Ok(())
    }

    async fn hide_status(&self, _id: &SessionId) -> Result<(), PresentationError> {
        Ok(())
    }
}
