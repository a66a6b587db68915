// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine path and behaviour configuration

use crate::reconcile::ReconcileIntent;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// State file, relative to the workspace root.
pub const DEFAULT_STATE_FILE: &str = "_featstate/agent_states.json";
/// Command bridge directory, relative to the workspace root.
pub const DEFAULT_COMMAND_DIR: &str = "_logs/agent_commands";
/// Hooks directory (legacy `.stop` files), relative to the workspace root.
pub const DEFAULT_HOOKS_DIR: &str = "_logs/hooks";
/// Trigger files live here, under the hooks directory.
pub const TRIGGER_SUBDIR: &str = "state_updates";

/// Command run inside a freshly spawned session.
pub const DEFAULT_LAUNCH_COMMAND: &str =
    "_scripts/asuperherohasemerged.sh ${kind} ${task} --model ${model}";

/// Monitoring of a local session ends after this long.
pub const DEFAULT_MONITOR_CAP: Duration = Duration::from_secs(2 * 60 * 60);

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory new sessions start in
    pub workspace_root: PathBuf,
    /// External state file describing session state and health
    pub state_file: PathBuf,
    /// Command bridge directory
    pub command_dir: PathBuf,
    /// Directory holding legacy `<session>.stop` files
    pub hooks_dir: PathBuf,
    /// Directory holding `<name>.trigger` files
    pub trigger_dir: PathBuf,
    /// Launch template; see [`crate::launch`]
    pub launch_command: String,
    /// Whether discovered sessions get a terminal or a status item only
    pub discovery: ReconcileIntent,
    /// Raise desktop notifications
    pub notifications: bool,
    pub monitor_cap: Duration,
    /// Bound on multiplexer queries during reconciliation
    pub ground_truth_timeout: Duration,
}

impl EngineConfig {
    /// Defaults for a workspace rooted at `root`.
    pub fn for_workspace(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let hooks_dir = root.join(DEFAULT_HOOKS_DIR);
        Self {
            state_file: root.join(DEFAULT_STATE_FILE),
            command_dir: root.join(DEFAULT_COMMAND_DIR),
            trigger_dir: hooks_dir.join(TRIGGER_SUBDIR),
            hooks_dir,
            workspace_root: root,
            launch_command: DEFAULT_LAUNCH_COMMAND.to_string(),
            discovery: ReconcileIntent::default(),
            notifications: true,
            monitor_cap: DEFAULT_MONITOR_CAP,
            ground_truth_timeout: mw_adapters::env::ground_truth_timeout_ms(),
        }
    }

    /// Point the hooks directory elsewhere; the trigger directory follows it.
    pub fn with_hooks_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.hooks_dir = dir.into();
        self.trigger_dir = self.hooks_dir.join(TRIGGER_SUBDIR);
        self
    }

    /// Resolve a possibly relative path against the workspace root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
