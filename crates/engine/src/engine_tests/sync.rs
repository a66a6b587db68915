// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State-file snapshots and reconciliation

use super::*;
use mw_core::ChangeKind;
use std::time::Duration;

fn kinds(changes: &[SessionChange]) -> Vec<(&str, ChangeKind)> {
    changes
        .iter()
        .map(|c| (c.identifier.as_str(), c.kind))
        .collect()
}

#[tokio::test]
async fn busy_factory_session_is_presented() {
    let ctx = setup();

    let changes = ctx
        .engine
        .apply_snapshot(snapshot(&[("factory-TC-001", LifecycleState::Busy)]))
        .await;

    assert_eq!(kinds(&changes), vec![("factory-TC-001", ChangeKind::Added)]);
    let summary = ctx.summary("factory-TC-001").await;
    assert_eq!(summary.display_name, "FA-S-001");
    assert_eq!(summary.state, LifecycleState::Busy);
    assert_eq!(summary.origin, RecordOrigin::Discovered);
    assert!(!summary.has_terminal);
    assert!(ctx.presenter.status("factory-TC-001").is_some());
}

#[tokio::test]
async fn identical_snapshot_is_a_no_op_for_status_only_sessions() {
    let ctx = setup();
    let snap = snapshot(&[
        ("factory-TC-001", LifecycleState::Busy),
        ("qa-alpha", LifecycleState::Idle),
    ]);
    ctx.engine.apply_snapshot(snap.clone()).await;

    let changes = ctx.engine.apply_snapshot(snap).await;

    assert!(changes.is_empty());
}

#[tokio::test]
async fn identical_snapshot_rerenders_terminal_owners() {
    let ctx = setup();
    ctx.sessions.add_session("qa-alpha", true);
    let snap = snapshot(&[
        ("factory-TC-001", LifecycleState::Busy),
        ("qa-alpha", LifecycleState::Idle),
    ]);
    ctx.engine.apply_snapshot(snap.clone()).await;
    ctx.command(r#"{"command":"create_terminal","session_name":"qa-alpha"}"#)
        .await;
    ctx.presenter.clear_calls();

    let changes = ctx.engine.apply_snapshot(snap).await;

    assert_eq!(kinds(&changes), vec![("qa-alpha", ChangeKind::Updated)]);
    assert!(ctx
        .presenter
        .calls()
        .iter()
        .any(|c| matches!(c, PresentationCall::UpdateTerminal { title, .. } if title == "🔍 ⚪ QA-S-alpha")));
}

#[tokio::test]
async fn removed_entry_drops_discovered_record() {
    let ctx = setup();
    ctx.engine
        .apply_snapshot(snapshot(&[
            ("factory-TC-001", LifecycleState::Busy),
            ("qa-alpha", LifecycleState::Idle),
        ]))
        .await;

    let changes = ctx
        .engine
        .apply_snapshot(snapshot(&[("qa-alpha", LifecycleState::Idle)]))
        .await;

    assert_eq!(kinds(&changes), vec![("factory-TC-001", ChangeKind::Removed)]);
    assert_eq!(ctx.ids().await, vec!["qa-alpha"]);
    assert!(ctx.presenter.status("factory-TC-001").is_none());
}

#[tokio::test]
async fn removed_entry_keeps_local_record() {
    let ctx = setup();
    ctx.engine
        .apply_snapshot(snapshot(&[("qa-alpha", LifecycleState::Busy)]))
        .await;
    ctx.command(r#"{"command":"register_current_terminal","session_name":"qa-alpha","agent_type":"qa"}"#)
        .await;

    ctx.engine.apply_snapshot(snapshot(&[])).await;

    let summary = ctx.summary("qa-alpha").await;
    assert_eq!(summary.origin, RecordOrigin::Registered);
    assert!(summary.has_terminal);
}

#[tokio::test]
async fn unsafe_identifiers_are_skipped_but_remembered() {
    let ctx = setup();

    let changes = ctx
        .engine
        .apply_snapshot(snapshot_json(
            r#"{"sessions":{"qa-alpha":"busy","qa alpha; rm -rf /":"busy"}}"#,
        ))
        .await;

    assert_eq!(changes.len(), 2);
    assert_eq!(ctx.ids().await, vec!["qa-alpha"]);
    assert!(ctx
        .engine
        .current_snapshot()
        .await
        .get("qa alpha; rm -rf /")
        .is_some());
}

#[tokio::test]
async fn parse_failure_keeps_last_snapshot() {
    let ctx = setup();
    ctx.engine
        .apply_snapshot(snapshot(&[("qa-alpha", LifecycleState::Busy)]))
        .await;

    let changes = ctx
        .engine
        .apply_watch_event(WatchEvent::ParseFailed("expected value".into()))
        .await;

    assert!(changes.is_empty());
    assert_eq!(ctx.ids().await, vec!["qa-alpha"]);
    assert!(ctx.engine.current_snapshot().await.get("qa-alpha").is_some());
}

#[tokio::test]
async fn model_hint_fills_display_tier() {
    let ctx = setup();

    ctx.engine
        .apply_snapshot(snapshot_json(
            r#"{"sessions":{"factory-TC-001":{"state":"busy","model":"opus"}}}"#,
        ))
        .await;

    assert_eq!(ctx.summary("factory-TC-001").await.display_name, "FA-O-001");
}

#[tokio::test]
async fn reconcile_keeps_only_alive_sessions() {
    let ctx = setup();
    ctx.sessions.add_session("factory-TC-001", true);
    ctx.sessions.add_session("qa-alpha", true);
    ctx.write_state(
        r#"{"sessions":{"factory-TC-001":"busy","qa-alpha":"idle","weaver-echo":"busy"}}"#,
    );

    let report = ctx
        .engine
        .reconcile(ReconcileIntent::Passive)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.created, 2);
    assert_eq!(ctx.ids().await, vec!["factory-TC-001", "qa-alpha"]);
}

#[tokio::test]
async fn reconcile_with_missing_file_uses_last_snapshot() {
    let ctx = setup();
    ctx.sessions.add_session("qa-alpha", true);
    ctx.engine
        .apply_snapshot(snapshot(&[
            ("qa-alpha", LifecycleState::Busy),
            ("weaver-echo", LifecycleState::Busy),
        ]))
        .await;

    let report = ctx
        .engine
        .reconcile(ReconcileIntent::Passive)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.kept, 1);
    assert_eq!(report.dropped, 1);
    assert_eq!(ctx.ids().await, vec!["qa-alpha"]);
}

#[tokio::test(start_paused = true)]
async fn overlapping_reconcile_is_skipped() {
    let ctx = setup();
    ctx.sessions.add_session("qa-alpha", true);
    ctx.sessions.set_list_delay(Some(Duration::from_millis(500)));

    let (first, second) = tokio::join!(
        ctx.engine.reconcile(ReconcileIntent::Passive),
        ctx.engine.reconcile(ReconcileIntent::Passive),
    );

    assert!(first.unwrap().is_some());
    assert!(second.unwrap().is_none());

    // The flag is released once the first pass finishes
    assert!(ctx
        .engine
        .reconcile(ReconcileIntent::Passive)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn reconcile_failure_is_reported() {
    let ctx = setup();
    ctx.sessions.set_list_error(Some("no server"));

    let err = ctx
        .engine
        .reconcile(ReconcileIntent::Passive)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Session(_)));
    assert!(ctx
        .engine
        .reconcile(ReconcileIntent::Passive)
        .await
        .is_err());
}

#[tokio::test]
async fn reconcile_attach_creates_terminals() {
    let ctx = setup();
    ctx.sessions.add_session("qa-alpha", true);
    ctx.write_state(r#"{"sessions":{"qa-alpha":"busy"}}"#);

    ctx.engine
        .reconcile(ReconcileIntent::Attach)
        .await
        .unwrap();

    assert_eq!(ctx.presenter.live_terminals(), vec!["🔍 🔵 QA-S-alpha"]);
    assert!(ctx
        .sessions
        .calls()
        .contains(&SessionCall::ListSessions));
}
