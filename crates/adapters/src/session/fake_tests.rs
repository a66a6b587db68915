// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mw_core::test_support::sid;

#[tokio::test]
async fn fake_session_spawn_and_list() {
    let adapter = FakeSessionAdapter::new();
    let id = sid("factory-TC-001");
    adapter
        .spawn(&id, Path::new("/work"), "run-agent factory")
        .await
        .unwrap();

    assert_eq!(adapter.list_sessions().await.unwrap(), vec!["factory-TC-001"]);
    assert_eq!(adapter.get_session("factory-TC-001").unwrap().cmd, "run-agent factory");
    assert_eq!(
        adapter.calls()[0],
        SessionCall::Spawn {
            id: "factory-TC-001".into(),
            cwd: PathBuf::from("/work"),
            cmd: "run-agent factory".into(),
        }
    );
}

#[tokio::test]
async fn fake_session_lifecycle() {
    let adapter = FakeSessionAdapter::new();
    let id = sid("qa-alpha");
    adapter.add_session("qa-alpha", true);
    assert!(adapter.is_alive(&id).await.unwrap());

    adapter.kill(&id).await.unwrap();
    assert!(!adapter.is_alive(&id).await.unwrap());
    assert!(adapter.list_sessions().await.unwrap().is_empty());
}

#[tokio::test]
async fn fake_spawn_rejects_live_duplicate() {
    let adapter = FakeSessionAdapter::new();
    adapter.add_session("qa-alpha", true);
    let err = adapter
        .spawn(&sid("qa-alpha"), Path::new("/tmp"), "x")
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::AlreadyExists(_)));
}

#[tokio::test]
async fn fake_list_error_is_injectable() {
    let adapter = FakeSessionAdapter::new();
    adapter.set_list_error(Some("boom"));
    assert!(adapter.list_sessions().await.is_err());
    adapter.set_list_error(None);
    assert!(adapter.list_sessions().await.is_ok());
}

#[tokio::test]
async fn fake_pane_cwd() {
    let adapter = FakeSessionAdapter::new();
    adapter.add_session_in("weaver-echo", "/repo", true);
    adapter.add_session("main", true);
    assert_eq!(
        adapter.pane_cwd(&sid("weaver-echo")).await.unwrap(),
        Some(PathBuf::from("/repo"))
    );
    assert_eq!(adapter.pane_cwd(&sid("main")).await.unwrap(), None);
    assert!(adapter.pane_cwd(&sid("gone")).await.is_err());
}
