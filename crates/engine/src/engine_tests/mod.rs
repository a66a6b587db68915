// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine tests

mod commands;
mod lifecycle;
mod sync;

use super::*;
use crate::record::RecordOrigin;
use crate::test_helpers::{setup, setup_with, TestContext};
use mw_adapters::{PresentationCall, SessionCall};
use mw_core::test_support::{snapshot, snapshot_json};
use mw_core::LifecycleState;

impl TestContext {
    /// Summary of a tracked session; panics when absent.
    async fn summary(&self, id: &str) -> SessionSummary {
        self.engine
            .session(id)
            .await
            .unwrap_or_else(|| panic!("session {id} is not tracked"))
    }

    async fn ids(&self) -> Vec<String> {
        self.engine
            .sessions()
            .await
            .into_iter()
            .map(|s| s.id.into())
            .collect()
    }

    /// Drop a command file, run one bridge pass and return the response.
    async fn command(&self, json: &str) -> String {
        self.write_command("cmd.json", json);
        assert_eq!(self.engine.bridge_tick().await, 1);
        self.response("cmd.json").unwrap()
    }
}
