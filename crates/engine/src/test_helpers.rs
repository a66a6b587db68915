// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use crate::{Engine, EngineConfig, EngineDeps, SessionRegistry};
use mw_adapters::{FakeNotifyAdapter, FakePresentationAdapter, FakeSessionAdapter};
use mw_core::{FakeClock, SessionPayload};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Registry over fake adapters.
pub(crate) type TestRegistry = SessionRegistry<FakePresentationAdapter, FakeNotifyAdapter>;

/// Convenience alias for the fully-typed test engine.
pub(crate) type TestEngine =
    Engine<FakeSessionAdapter, FakePresentationAdapter, FakeNotifyAdapter, FakeClock>;

pub(crate) fn registry() -> (TestRegistry, FakePresentationAdapter, FakeNotifyAdapter) {
    let presenter = FakePresentationAdapter::new();
    let notifier = FakeNotifyAdapter::new();
    (
        SessionRegistry::new(presenter.clone(), notifier.clone(), true),
        presenter,
        notifier,
    )
}

pub(crate) fn payload(json: &str) -> SessionPayload {
    serde_json::from_str(json).unwrap()
}

/// Test context holding the engine, its adapters and a temp workspace.
pub(crate) struct TestContext {
    pub engine: TestEngine,
    pub clock: FakeClock,
    pub sessions: FakeSessionAdapter,
    pub presenter: FakePresentationAdapter,
    pub notifier: FakeNotifyAdapter,
    pub config: EngineConfig,
    _dir: TempDir,
}

impl TestContext {
    pub fn root(&self) -> &Path {
        &self.config.workspace_root
    }

    /// Overwrite the state file.
    pub fn write_state(&self, json: &str) {
        write_file(&self.config.state_file, json);
    }

    pub fn write_trigger(&self, name: &str, content: &str) -> PathBuf {
        let path = self.config.trigger_dir.join(format!("{name}.trigger"));
        write_file(&path, content);
        path
    }

    pub fn write_stop(&self, session: &str, content: &str) -> PathBuf {
        let path = self.config.hooks_dir.join(format!("{session}.stop"));
        write_file(&path, content);
        path
    }

    pub fn write_command(&self, name: &str, json: &str) -> PathBuf {
        let path = self.config.command_dir.join(name);
        write_file(&path, json);
        path
    }

    /// Response written for a command file, if any.
    pub fn response(&self, name: &str) -> Option<String> {
        std::fs::read_to_string(self.config.command_dir.join(format!("{name}.response"))).ok()
    }
}

pub(crate) fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

pub(crate) fn setup() -> TestContext {
    setup_with(|_| {})
}

pub(crate) fn setup_with(configure: impl FnOnce(&mut EngineConfig)) -> TestContext {
    let dir = tempfile::tempdir().unwrap();
    let mut config = EngineConfig::for_workspace(dir.path());
    config.launch_command = "run-agent ${kind} ${task} --model ${model}".to_string();
    configure(&mut config);

    let sessions = FakeSessionAdapter::new();
    let presenter = FakePresentationAdapter::new();
    let notifier = FakeNotifyAdapter::new();
    let clock = FakeClock::new();
    let engine = Engine::new(
        EngineDeps {
            sessions: sessions.clone(),
            presenter: presenter.clone(),
            notifier: notifier.clone(),
        },
        clock.clone(),
        config.clone(),
    );

    TestContext {
        engine,
        clock,
        sessions,
        presenter,
        notifier,
        config,
        _dir: dir,
    }
}
