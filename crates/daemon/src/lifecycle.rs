// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: configuration, startup, shutdown.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use mw_adapters::{
    DesktopNotifyAdapter, StateFileWatcher, TmuxAdapter, TmuxPresentation, TracedSession,
    WatchEvent, WatcherConfig,
};
use mw_core::SystemClock;
use mw_engine::{Engine, EngineConfig, EngineDeps, ReconcileIntent};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Engine with concrete adapter types (session calls wrapped with tracing)
pub type DaemonEngine =
    Engine<TracedSession<TmuxAdapter>, TmuxPresentation, DesktopNotifyAdapter, SystemClock>;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/mw)
    pub state_dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Aggregated status line for the multiplexer status bar
    pub status_path: PathBuf,
    /// Optional TOML overrides
    pub config_path: PathBuf,
    pub engine: EngineConfig,
}

/// Overrides read from `config.toml`. Relative paths resolve against the
/// workspace root, except `status_file` which resolves against the state dir.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub state_file: Option<PathBuf>,
    pub command_dir: Option<PathBuf>,
    pub hooks_dir: Option<PathBuf>,
    pub launch_command: Option<String>,
    pub discovery: Option<ReconcileIntent>,
    pub notifications: Option<bool>,
    pub status_file: Option<PathBuf>,
}

impl FileConfig {
    /// Read `path`; a missing file means no overrides.
    pub fn load(path: &Path) -> Result<Self, LifecycleError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&text).map_err(|source| LifecycleError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply(self, config: &mut Config) {
        let engine = &mut config.engine;
        if let Some(path) = self.state_file {
            engine.state_file = engine.resolve(&path);
        }
        if let Some(path) = self.command_dir {
            engine.command_dir = engine.resolve(&path);
        }
        if let Some(path) = self.hooks_dir {
            *engine = engine.clone().with_hooks_dir(engine.resolve(&path));
        }
        if let Some(command) = self.launch_command {
            engine.launch_command = command;
        }
        if let Some(discovery) = self.discovery {
            engine.discovery = discovery;
        }
        if let Some(notifications) = self.notifications {
            engine.notifications = notifications;
        }
        if let Some(path) = self.status_file {
            config.status_path = config.state_dir.join(path);
        }
    }
}

impl Config {
    /// Load configuration from the environment and `config.toml`.
    pub fn load() -> Result<Self, LifecycleError> {
        Self::resolve(crate::env::state_dir()?, crate::env::workspace_root()?)
    }

    /// Configuration for an explicit state directory and workspace.
    pub fn resolve(state_dir: PathBuf, workspace_root: PathBuf) -> Result<Self, LifecycleError> {
        let mut config = Self {
            lock_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            status_path: state_dir.join("status.txt"),
            config_path: state_dir.join("config.toml"),
            engine: EngineConfig::for_workspace(workspace_root),
            state_dir,
        };
        FileConfig::load(&config.config_path)?.apply(&mut config);
        Ok(config)
    }
}

/// Daemon state during operation.
pub struct DaemonState {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub engine: Arc<DaemonEngine>,
    pub watcher: StateFileWatcher,
    /// State-file events, subscribed before the watcher started
    pub events: broadcast::Receiver<WatchEvent>,
    /// On-demand reconciliation started by SIGHUP, if any
    pub reconcile_task: Option<JoinHandle<()>>,
}

impl DaemonState {
    /// Stop inputs, dispose presentation resources and release the pid file.
    ///
    /// Multiplexer sessions are left running.
    pub async fn shutdown(&mut self) {
        info!("Shutting down daemon...");
        self.watcher.close();
        if let Some(task) = self.reconcile_task.take() {
            task.abort();
            let _ = task.await;
        }
        self.engine.shutdown().await;

        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }
        info!("Daemon shutdown complete");
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub async fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config).await {
        Ok(daemon) => Ok(daemon),
        Err(e) => {
            // The pid file belongs to the running daemon when locking failed
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

async fn startup_inner(config: &Config) -> Result<DaemonState, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;
    let lock_file = acquire_lock(&config.lock_path)?;

    let sessions = TracedSession::new(
        TmuxAdapter::new().with_query_timeout(config.engine.ground_truth_timeout),
    );
    let engine = Arc::new(Engine::new(
        EngineDeps {
            sessions,
            presenter: TmuxPresentation::new(Some(config.status_path.clone())),
            notifier: DesktopNotifyAdapter::new(),
        },
        SystemClock,
        config.engine.clone(),
    ));

    match engine.startup().await {
        Ok(report) => info!(
            kept = report.kept,
            created = report.created,
            dropped = report.dropped,
            "initial discovery complete"
        ),
        Err(e) => warn!(error = %e, "initial discovery failed; continuing with empty registry"),
    }

    let mut watcher = StateFileWatcher::new(WatcherConfig::new(&config.engine.state_file));
    let events = watcher.subscribe();
    watcher.start();
    info!(path = %config.engine.state_file.display(), "watching state file");

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        engine,
        watcher,
        events,
        reconcile_task: None,
    })
}

/// Take the exclusive lock on `path` and write our pid into it.
pub(crate) fn acquire_lock(path: &Path) -> Result<File, LifecycleError> {
    // Open without truncating so a running daemon's pid survives a failed attempt
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    use std::io::Write;
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    Ok(lock_file)
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
