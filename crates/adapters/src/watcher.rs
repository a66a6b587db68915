// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State file watcher.
//!
//! Watches the state file and its parent directory (writers that replace the
//! file by rename are only visible on the directory), debounces bursts of raw
//! events, then reads and decodes the file and broadcasts the result. When
//! native notification cannot be set up it polls on a fixed interval instead.

use mw_core::StateSnapshot;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Decoded state-file update delivered to subscribers.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    Snapshot(StateSnapshot),
    /// The file was read but did not decode; subscribers keep their last snapshot.
    ParseFailed(String),
}

#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub path: PathBuf,
    pub debounce: Duration,
    pub poll_interval: Duration,
}

impl WatcherConfig {
    /// Config for `path` with timings from the environment.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            debounce: crate::env::debounce_ms(),
            poll_interval: crate::env::watcher_poll_ms(),
        }
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

struct Running {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Restartable watcher over the state file.
///
/// Subscribers receive events through [`StateFileWatcher::subscribe`];
/// dropping the receiver unsubscribes. Subscriptions survive `close`/`reopen`.
pub struct StateFileWatcher {
    config: WatcherConfig,
    events: broadcast::Sender<WatchEvent>,
    running: Option<Running>,
}

impl StateFileWatcher {
    pub fn new(config: WatcherConfig) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            config,
            events,
            running: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WatchEvent> {
        self.events.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Start watching; the file is loaded once immediately. No-op if running.
    pub fn start(&mut self) {
        if self.running.is_some() {
            return;
        }
        let (shutdown, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(watch_state_file(
            self.config.clone(),
            self.events.clone(),
            shutdown_rx,
        ));
        self.running = Some(Running { shutdown, task });
    }

    /// Stop watching. Any pending debounce timer dies with the task. Idempotent.
    pub fn close(&mut self) {
        if let Some(running) = self.running.take() {
            let _ = running.shutdown.send(());
            running.task.abort();
            tracing::debug!(path = %self.config.path.display(), "state watcher closed");
        }
    }

    pub fn reopen(&mut self) {
        self.close();
        self.start();
    }
}

impl Drop for StateFileWatcher {
    fn drop(&mut self) {
        self.close();
    }
}

async fn watch_state_file(
    config: WatcherConfig,
    events: broadcast::Sender<WatchEvent>,
    shutdown_rx: oneshot::Receiver<()>,
) {
    load_and_emit(&config.path, &events).await;

    let (ping_tx, ping_rx) = mpsc::channel(32);
    match create_file_watcher(&config.path, ping_tx) {
        Ok(guard) => {
            tracing::info!(path = %config.path.display(), "watching state file");
            watch_loop(&config, &events, ping_rx, shutdown_rx).await;
            drop(guard);
        }
        Err(e) => {
            tracing::warn!(
                path = %config.path.display(),
                error = %e,
                "failed to create file watcher, using fallback polling"
            );
            poll_loop(&config, &events, shutdown_rx).await;
        }
    }
}

async fn watch_loop(
    config: &WatcherConfig,
    events: &broadcast::Sender<WatchEvent>,
    mut ping_rx: mpsc::Receiver<()>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut deadline: Option<Instant> = None;
    loop {
        tokio::select! {
            ping = ping_rx.recv() => {
                if ping.is_none() {
                    break;
                }
                // Each raw event restarts the debounce window
                deadline = Some(Instant::now() + config.debounce);
            }
            _ = sleep_until_deadline(deadline) => {
                deadline = None;
                load_and_emit(&config.path, events).await;
            }
            _ = &mut shutdown_rx => {
                tracing::debug!("watcher shutdown requested");
                break;
            }
        }
    }
}

/// Fallback polling when native watching isn't available
async fn poll_loop(
    config: &WatcherConfig,
    events: &broadcast::Sender<WatchEvent>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut interval = tokio::time::interval(config.poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick is immediate and the file was just loaded
    interval.tick().await;
    loop {
        tokio::select! {
            _ = interval.tick() => load_and_emit(&config.path, events).await,
            _ = &mut shutdown_rx => {
                tracing::debug!("poll watcher shutdown requested");
                break;
            }
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Read, decode and broadcast. A missing or unreadable file is transient and
/// skipped; the next event or poll retries.
async fn load_and_emit(path: &Path, events: &broadcast::Sender<WatchEvent>) {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "state file not readable, will retry");
            return;
        }
    };
    let event = match StateSnapshot::parse(&text) {
        Ok(snapshot) => WatchEvent::Snapshot(snapshot),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "state file parse failed, keeping last snapshot");
            WatchEvent::ParseFailed(e.to_string())
        }
    };
    // No subscribers is fine
    let _ = events.send(event);
}

fn create_file_watcher(
    path: &Path,
    tx: mpsc::Sender<()>,
) -> Result<RecommendedWatcher, notify::Error> {
    let file_name: Option<OsString> = path.file_name().map(|n| n.to_os_string());
    let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
        let Ok(event) = res else { return };
        let relevant = event.paths.is_empty()
            || event
                .paths
                .iter()
                .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
        if relevant {
            // Full channel means a reload is already pending
            let _ = tx.try_send(());
        }
    })?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    watcher.watch(&parent, RecursiveMode::NonRecursive)?;
    if path.exists() {
        if let Err(e) = watcher.watch(path, RecursiveMode::NonRecursive) {
            tracing::debug!(path = %path.display(), error = %e, "file-level watch unavailable");
        }
    }
    Ok(watcher)
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
