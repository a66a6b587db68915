// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification adapters

mod desktop;
mod noop;

pub use desktop::DesktopNotifyAdapter;
pub use noop::NoOpNotifyAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifyAdapter;

use async_trait::async_trait;
use mw_core::LifecycleState;
use thiserror::Error;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// How urgent a notice is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    /// Level for a session entering `state`.
    pub fn for_state(state: LifecycleState) -> Self {
        match state {
            LifecycleState::Error => NoticeLevel::Error,
            LifecycleState::Terminated | LifecycleState::Stopped => NoticeLevel::Warning,
            _ => NoticeLevel::Info,
        }
    }
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn new(title: impl Into<String>, body: impl Into<String>, level: NoticeLevel) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            level,
        }
    }

    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(title, body, NoticeLevel::Info)
    }
}

/// Adapter for sending notifications
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    async fn notify(&self, notice: &Notice) -> Result<(), NotifyError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
