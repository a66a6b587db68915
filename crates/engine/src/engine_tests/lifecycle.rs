// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup, monitoring and shutdown

use super::*;
use std::time::Duration;

fn with_live_state(ctx: &TestContext) {
    ctx.sessions.add_session("factory-TC-001", true);
    ctx.sessions.add_session("qa-alpha", true);
    ctx.write_state(r#"{"sessions":{"factory-TC-001":"busy","qa-alpha":"idle"}}"#);
}

#[tokio::test]
async fn passive_startup_announces_discovered_sessions() {
    let ctx = setup();
    with_live_state(&ctx);

    let report = ctx.engine.startup().await.unwrap();

    assert_eq!(report.created, 2);
    assert_eq!(
        ctx.notifier.bodies(),
        vec!["Discovered 2 active agent session(s)"]
    );
    assert!(ctx.presenter.live_terminals().is_empty());
}

#[tokio::test]
async fn attach_startup_announces_attached_sessions() {
    let ctx = setup_with(|c| c.discovery = ReconcileIntent::Attach);
    with_live_state(&ctx);

    ctx.engine.startup().await.unwrap();

    assert_eq!(
        ctx.notifier.bodies(),
        vec!["Attached to 2 existing agent session(s)"]
    );
    assert_eq!(ctx.presenter.live_terminals().len(), 2);
}

#[tokio::test]
async fn startup_with_nothing_found_is_silent() {
    let ctx = setup();

    let report = ctx.engine.startup().await.unwrap();

    assert_eq!(report, ReconcileReport::default());
    assert!(ctx.notifier.notices().is_empty());
}

#[tokio::test]
async fn disabled_notifications_are_not_sent() {
    let ctx = setup_with(|c| c.notifications = false);
    with_live_state(&ctx);

    ctx.engine.startup().await.unwrap();
    ctx.engine
        .apply_snapshot(snapshot(&[("qa-alpha", LifecycleState::Error)]))
        .await;

    assert!(ctx.notifier.notices().is_empty());
    assert_eq!(ctx.summary("qa-alpha").await.state, LifecycleState::Error);
}

#[tokio::test]
async fn watcher_snapshot_events_are_applied() {
    let ctx = setup();

    let changes = ctx
        .engine
        .apply_watch_event(WatchEvent::Snapshot(snapshot(&[(
            "qa-alpha",
            LifecycleState::Busy,
        )])))
        .await;

    assert_eq!(changes.len(), 1);
    assert_eq!(ctx.summary("qa-alpha").await.state, LifecycleState::Busy);
}

#[tokio::test]
async fn monitor_tick_applies_trigger_to_spawned_agent() {
    let ctx = setup();
    ctx.command(r#"{"command":"spawn","agent_type":"qa"}"#).await;
    let trigger = ctx.write_trigger("qa-alpha", "busy:1700000000");

    ctx.engine.monitor_tick().await;

    assert!(!trigger.exists());
    assert_eq!(ctx.summary("qa-alpha").await.state, LifecycleState::Busy);
    assert_eq!(ctx.presenter.live_terminals(), vec!["🔍 🔵 QA-S-alpha"]);
}

#[tokio::test]
async fn monitor_tick_detects_exited_session() {
    let ctx = setup();
    ctx.command(r#"{"command":"spawn","agent_type":"qa"}"#).await;
    ctx.sessions.set_dead("qa-alpha");

    ctx.engine.monitor_tick().await;

    let summary = ctx.summary("qa-alpha").await;
    assert_eq!(summary.state, LifecycleState::Terminated);
    assert!(!summary.monitored);
    assert_eq!(
        ctx.notifier.bodies(),
        vec!["🛑 Agent QA-S-alpha is now terminated"]
    );

    // The next reconcile disposes the terminated record
    ctx.engine
        .reconcile(ReconcileIntent::Passive)
        .await
        .unwrap();
    assert!(ctx.ids().await.is_empty());
    assert!(ctx.presenter.live_terminals().is_empty());
}

#[tokio::test]
async fn monitor_tick_honours_stop_file() {
    let ctx = setup();
    ctx.command(r#"{"command":"spawn","agent_type":"qa"}"#).await;
    ctx.write_stop("qa-alpha", "STOP:1700000000:qa-alpha:error");

    ctx.engine.monitor_tick().await;

    assert_eq!(ctx.summary("qa-alpha").await.state, LifecycleState::Error);
}

#[tokio::test]
async fn monitoring_lapses_after_cap() {
    let ctx = setup_with(|c| c.monitor_cap = Duration::from_secs(60));
    ctx.command(r#"{"command":"spawn","agent_type":"qa"}"#).await;
    ctx.clock.advance(Duration::from_secs(61));
    ctx.write_trigger("qa-alpha", "done:1700000000");

    ctx.engine.monitor_tick().await;

    let summary = ctx.summary("qa-alpha").await;
    assert_eq!(summary.state, LifecycleState::Idle);
    assert!(!summary.monitored);
}

#[tokio::test]
async fn shutdown_disposes_everything() {
    let ctx = setup();
    with_live_state(&ctx);
    ctx.engine.startup().await.unwrap();
    ctx.command(r#"{"command":"spawn","agent_type":"weaver","task_id":"TC-5"}"#)
        .await;

    ctx.engine.shutdown().await;

    assert!(ctx.engine.sessions().await.is_empty());
    assert!(ctx.presenter.live_terminals().is_empty());
    assert_eq!(ctx.presenter.status_count(), 0);
}

#[tokio::test]
async fn runs_headless_without_a_multiplexer() {
    use mw_adapters::{NoOpNotifyAdapter, NoOpPresentationAdapter, NoOpSessionAdapter};

    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::for_workspace(dir.path());
    crate::test_helpers::write_file(
        &config.state_file,
        r#"{"sessions":{"qa-alpha":"busy"}}"#,
    );
    let engine = Engine::new(
        EngineDeps {
            sessions: NoOpSessionAdapter::new(),
            presenter: NoOpPresentationAdapter::new(),
            notifier: NoOpNotifyAdapter::new(),
        },
        mw_core::FakeClock::new(),
        config.clone(),
    );

    // Nothing is alive, so the state file's sessions are not adopted
    let report = engine.startup().await.unwrap();
    assert_eq!(report, ReconcileReport::default());

    crate::test_helpers::write_file(
        &config.command_dir.join("cmd.json"),
        r#"{"command":"refresh"}"#,
    );
    assert_eq!(engine.bridge_tick().await, 1);
    let response = std::fs::read_to_string(config.command_dir.join("cmd.json.response")).unwrap();
    assert_eq!(response, "Refreshed: 0 kept, 0 discovered, 0 dropped");
    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn work_queued_behind_shutdown_is_dropped() {
    let ctx = setup();
    with_live_state(&ctx);
    ctx.sessions.set_list_delay(Some(Duration::from_millis(500)));

    // The reconcile holds the state lock while the multiplexer query is slow;
    // shutdown and the snapshot queue behind it in that order.
    let (reconciled, _, changes) = tokio::join!(
        ctx.engine.reconcile(ReconcileIntent::Attach),
        ctx.engine.shutdown(),
        ctx.engine
            .apply_snapshot(snapshot(&[("weaver-echo", LifecycleState::Busy)])),
    );

    assert_eq!(reconciled.unwrap().map(|r| r.created), Some(2));
    assert!(changes.is_empty());
    assert!(ctx.engine.is_closed());
    assert!(ctx.engine.sessions().await.is_empty());
    assert!(ctx.presenter.live_terminals().is_empty());
    assert_eq!(ctx.presenter.status_count(), 0);
}

#[tokio::test]
async fn nothing_runs_after_shutdown() {
    let ctx = setup();
    with_live_state(&ctx);
    ctx.engine.shutdown().await;
    let command = ctx.write_command("late.json", r#"{"command":"refresh"}"#);

    assert_eq!(ctx.engine.reconcile(ReconcileIntent::Attach).await.unwrap(), None);
    assert_eq!(ctx.engine.bridge_tick().await, 0);
    ctx.engine.monitor_tick().await;

    assert!(command.exists());
    assert!(ctx.engine.sessions().await.is_empty());
    assert!(ctx.presenter.live_terminals().is_empty());
    assert_eq!(ctx.presenter.status_count(), 0);
}
