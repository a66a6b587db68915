// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notification adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Notice, NotifyAdapter, NotifyError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Fake notification adapter recording every notice
#[derive(Clone, Default)]
pub struct FakeNotifyAdapter {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl FakeNotifyAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded notices
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Bodies of all recorded notices
    pub fn bodies(&self) -> Vec<String> {
        self.notices.lock().iter().map(|n| n.body.clone()).collect()
    }
}

#[async_trait]
impl NotifyAdapter for FakeNotifyAdapter {
    async fn notify(&self, notice: &Notice) -> Result<(), NotifyError> {
        self.notices.lock().push(notice.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
