// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux presentation: window titles and status styling, plus an aggregated
//! status line written to a file for status bars to read.

use super::{PresentationAdapter, PresentationError, TerminalHandle};
use crate::subprocess::{run_with_timeout, TMUX_MUTATE_TIMEOUT};
use async_trait::async_trait;
use indexmap::IndexMap;
use mw_core::{SessionId, SessionView, TerminalIdGen};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;

/// Presentation through tmux itself.
#[derive(Clone)]
pub struct TmuxPresentation {
    status_file: Option<PathBuf>,
    /// Status items in insertion order: session id -> rendered item
    items: Arc<Mutex<IndexMap<String, String>>>,
    ids: TerminalIdGen,
}

impl TmuxPresentation {
    /// `status_file` receives the aggregated status line; `None` keeps it in memory.
    pub fn new(status_file: Option<PathBuf>) -> Self {
        Self {
            status_file,
            items: Arc::default(),
            ids: TerminalIdGen::new("tmux"),
        }
    }

    /// Current aggregated status line.
    pub fn status_line(&self) -> String {
        render_status_line(&self.items.lock())
    }

    async fn flush_status(&self) -> Result<(), PresentationError> {
        let Some(path) = &self.status_file else {
            return Ok(());
        };
        let line = self.status_line();
        write_atomic(path, &line).await?;
        Ok(())
    }

    async fn style(&self, session_id: &SessionId, view: &SessionView) -> Result<(), PresentationError> {
        let target = window_target(session_id);
        tmux(&["rename-window", "-t", &target, &view.title]).await?;
        if let Some(color) = view.color {
            let style = format!("bg={},fg=black", color);
            tmux(&["set-option", "-t", &target, "status-style", &style]).await?;
        }
        Ok(())
    }
}

/// Exact-match target for the session's active window. Without the trailing
/// colon tmux may first match a window of that name in the current session.
fn window_target(session_id: &SessionId) -> String {
    format!("={session_id}:")
}

fn render_item(view: &SessionView) -> String {
    format!("{}{}", view.status_text, view.state.indicator())
}

fn render_status_line(items: &IndexMap<String, String>) -> String {
    items.values().cloned().collect::<Vec<_>>().join(" ")
}

/// Write via a temp file and rename so readers never see a partial line.
async fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, format!("{content}\n")).await?;
    tokio::fs::rename(&tmp, path).await
}

async fn tmux(args: &[&str]) -> Result<(), PresentationError> {
    let mut cmd = Command::new("tmux");
    cmd.args(args);
    let description = format!("tmux {}", args.first().copied().unwrap_or_default());
    let output = run_with_timeout(cmd, TMUX_MUTATE_TIMEOUT, &description)
        .await
        .map_err(PresentationError::CommandFailed)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PresentationError::CommandFailed(format!(
            "{}: {}",
            description,
            stderr.trim()
        )));
    }
    Ok(())
}

#[async_trait]
impl PresentationAdapter for TmuxPresentation {
    async fn create_terminal(&self, view: &SessionView) -> Result<TerminalHandle, PresentationError> {
        self.style(&view.session_id, view).await?;
        let handle = TerminalHandle::new(self.ids.next(), view.session_id.clone());
        tracing::debug!(session_id = %view.session_id, terminal = %handle.id(), "terminal created");
        Ok(handle)
    }

    async fn update_terminal(
        &self,
        handle: &TerminalHandle,
        view: &SessionView,
    ) -> Result<(), PresentationError> {
        self.style(handle.session_id(), view).await
    }

    async fn dispose_terminal(&self, handle: TerminalHandle) -> Result<(), PresentationError> {
        // The session may already be gone; restoring its defaults is best-effort.
        let target = window_target(handle.session_id());
        if let Err(e) = tmux(&["set-option", "-u", "-t", &target, "status-style"]).await {
            tracing::debug!(session_id = %handle.session_id(), error = %e, "status-style reset skipped");
        }
        if let Err(e) = tmux(&["set-window-option", "-t", &target, "automatic-rename", "on"]).await {
            tracing::debug!(session_id = %handle.session_id(), error = %e, "automatic-rename reset skipped");
        }
        tracing::debug!(session_id = %handle.session_id(), terminal = %handle.id(), "terminal disposed");
        Ok(())
    }

    async fn show_status(&self, view: &SessionView) -> Result<(), PresentationError> {
        self.items
            .lock()
            .insert(view.session_id.to_string(), render_item(view));
        self.flush_status().await
    }

    async fn hide_status(&self, id: &SessionId) -> Result<(), PresentationError> {
        let removed = self.items.lock().shift_remove(id.as_str()).is_some();
        if removed {
            self.flush_status().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
