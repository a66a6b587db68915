// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mw_core::LifecycleState;
use tokio::sync::broadcast::error::TryRecvError;

const WAIT: Duration = Duration::from_secs(5);

fn fast_config(path: &Path) -> WatcherConfig {
    WatcherConfig::new(path)
        .debounce(Duration::from_millis(50))
        .poll_interval(Duration::from_millis(50))
}

async fn next_event(rx: &mut broadcast::Receiver<WatchEvent>) -> WatchEvent {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("watch event within timeout")
        .expect("channel open")
}

/// Wait for a snapshot whose session `id` has `state`, skipping stale ones.
async fn wait_for_state(
    rx: &mut broadcast::Receiver<WatchEvent>,
    id: &str,
    state: LifecycleState,
) -> StateSnapshot {
    let deadline = Instant::now() + WAIT;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let event = tokio::time::timeout(remaining, rx.recv())
            .await
            .expect("matching snapshot within timeout")
            .expect("channel open");
        if let WatchEvent::Snapshot(snap) = event {
            if snap.get(id).map(|p| p.state()) == Some(state) {
                return snap;
            }
        }
    }
}

fn write_state(path: &Path, id: &str, state: &str) {
    std::fs::write(path, format!(r#"{{"sessions":{{"{id}":"{state}"}}}}"#)).unwrap();
}

#[tokio::test]
async fn initial_load_emits_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent_states.json");
    write_state(&path, "factory-TC-001", "busy");

    let mut watcher = StateFileWatcher::new(fast_config(&path));
    let mut rx = watcher.subscribe();
    watcher.start();

    match next_event(&mut rx).await {
        WatchEvent::Snapshot(snap) => {
            assert_eq!(snap.get("factory-TC-001").unwrap().state(), LifecycleState::Busy)
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn modification_emits_new_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent_states.json");
    write_state(&path, "qa-alpha", "idle");

    let mut watcher = StateFileWatcher::new(fast_config(&path));
    let mut rx = watcher.subscribe();
    watcher.start();
    wait_for_state(&mut rx, "qa-alpha", LifecycleState::Idle).await;

    write_state(&path, "qa-alpha", "done");
    wait_for_state(&mut rx, "qa-alpha", LifecycleState::Done).await;
}

#[tokio::test]
async fn rename_replace_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent_states.json");
    write_state(&path, "qa-alpha", "idle");

    let mut watcher = StateFileWatcher::new(fast_config(&path));
    let mut rx = watcher.subscribe();
    watcher.start();
    wait_for_state(&mut rx, "qa-alpha", LifecycleState::Idle).await;

    let tmp = dir.path().join("agent_states.json.tmp");
    write_state(&tmp, "qa-alpha", "error");
    std::fs::rename(&tmp, &path).unwrap();
    wait_for_state(&mut rx, "qa-alpha", LifecycleState::Error).await;
}

#[tokio::test]
async fn burst_of_writes_is_debounced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent_states.json");
    write_state(&path, "s", "idle");

    let mut watcher = StateFileWatcher::new(
        WatcherConfig::new(&path).debounce(Duration::from_millis(200)),
    );
    let mut rx = watcher.subscribe();
    watcher.start();
    wait_for_state(&mut rx, "s", LifecycleState::Idle).await;

    for state in ["busy", "idle", "busy", "idle", "done"] {
        write_state(&path, "s", state);
    }
    wait_for_state(&mut rx, "s", LifecycleState::Done).await;

    tokio::time::sleep(Duration::from_millis(400)).await;
    let mut extra = 0;
    while rx.try_recv().is_ok() {
        extra += 1;
    }
    assert!(extra <= 1, "burst produced {extra} extra reloads");
}

#[tokio::test]
async fn parse_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent_states.json");
    std::fs::write(&path, "{\"sessions\": {").unwrap();

    let mut watcher = StateFileWatcher::new(fast_config(&path));
    let mut rx = watcher.subscribe();
    watcher.start();

    assert!(matches!(next_event(&mut rx).await, WatchEvent::ParseFailed(_)));
}

#[tokio::test]
async fn missing_file_is_silent_until_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent_states.json");

    let mut watcher = StateFileWatcher::new(fast_config(&path));
    let mut rx = watcher.subscribe();
    watcher.start();

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    write_state(&path, "weaver-echo", "busy");
    wait_for_state(&mut rx, "weaver-echo", LifecycleState::Busy).await;
}

#[tokio::test]
async fn missing_directory_falls_back_to_polling() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("_featstate");
    let path = sub.join("agent_states.json");

    let mut watcher = StateFileWatcher::new(fast_config(&path));
    let mut rx = watcher.subscribe();
    watcher.start();
    tokio::time::sleep(Duration::from_millis(100)).await;

    std::fs::create_dir_all(&sub).unwrap();
    write_state(&path, "planner-x", "idle");
    wait_for_state(&mut rx, "planner-x", LifecycleState::Idle).await;
}

#[tokio::test]
async fn close_stops_events_and_reopen_resumes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent_states.json");
    write_state(&path, "s", "idle");

    let mut watcher = StateFileWatcher::new(fast_config(&path));
    let mut rx = watcher.subscribe();
    watcher.start();
    wait_for_state(&mut rx, "s", LifecycleState::Idle).await;

    watcher.close();
    watcher.close();
    assert!(!watcher.is_running());
    write_state(&path, "s", "busy");
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    watcher.reopen();
    assert!(watcher.is_running());
    wait_for_state(&mut rx, "s", LifecycleState::Busy).await;
}

#[tokio::test]
async fn start_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent_states.json");
    write_state(&path, "s", "idle");

    let mut watcher = StateFileWatcher::new(fast_config(&path));
    let mut rx = watcher.subscribe();
    watcher.start();
    watcher.start();
    wait_for_state(&mut rx, "s", LifecycleState::Idle).await;

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}
