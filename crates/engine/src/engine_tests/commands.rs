// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-bridge handling

use super::*;

#[tokio::test]
async fn spawn_with_task_launches_and_tracks_agent() {
    let ctx = setup();

    let response = ctx
        .command(r#"{"command":"spawn","agent_type":"factory","task_id":"TC-042","model":"opus"}"#)
        .await;

    assert_eq!(response, "Agent spawned: FA-O-042 (factory-TC-042)");
    let session = ctx.sessions.get_session("factory-TC-042").unwrap();
    assert_eq!(session.cmd, "run-agent factory TC-042 --model opus");
    assert_eq!(session.cwd, ctx.root());

    let summary = ctx.summary("factory-TC-042").await;
    assert_eq!(summary.origin, RecordOrigin::Spawned);
    assert!(summary.has_terminal);
    assert!(summary.monitored);
    assert_eq!(ctx.presenter.live_terminals(), vec!["🏭 ⚪ FA-O-042 👑"]);
}

#[tokio::test]
async fn spawn_without_task_takes_next_free_phonetic_name() {
    let ctx = setup();
    ctx.sessions.add_session("qa-alpha", true);

    let response = ctx.command(r#"{"command":"spawn","agent_type":"qa"}"#).await;

    assert_eq!(response, "Agent spawned: QA-S-bravo (qa-bravo)");
    assert_eq!(
        ctx.sessions.get_session("qa-bravo").unwrap().cmd,
        "run-agent qa --model sonnet"
    );
}

#[tokio::test]
async fn spawn_phonetic_names_skip_tracked_sessions() {
    let ctx = setup();

    ctx.command(r#"{"command":"spawn","agent_type":"planner"}"#).await;
    let response = ctx.command(r#"{"command":"spawn","agent_type":"planner"}"#).await;

    assert_eq!(response, "Agent spawned: PL-S-bravo (planner-bravo)");
    assert_eq!(ctx.ids().await, vec!["planner-alpha", "planner-bravo"]);
}

#[yare::parameterized(
    unknown_kind  = { r#"{"command":"spawn","agent_type":"wizard"}"#, "Failed to spawn agent: unknown agent kind: wizard" },
    unknown_model = { r#"{"command":"spawn","agent_type":"qa","model":"gpt"}"#, "Failed to spawn agent: unknown model tier: gpt" },
    unsafe_task   = { r#"{"command":"spawn","agent_type":"qa","task_id":"x; rm -rf /"}"#, "Failed to spawn agent: invalid session identifier: \"qa-x; rm -rf /\"" },
)]
fn spawn_rejects_bad_arguments(json: &str, expected: &str) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    rt.block_on(async {
        let ctx = setup();
        assert_eq!(ctx.command(json).await, expected);
        assert!(ctx
            .sessions
            .calls()
            .iter()
            .all(|c| !matches!(c, SessionCall::Spawn { .. })));
    });
}

#[tokio::test]
async fn spawn_of_existing_session_fails() {
    let ctx = setup();
    ctx.sessions.add_session("factory-TC-042", true);

    let response = ctx
        .command(r#"{"command":"spawn","agent_type":"factory","task_id":"TC-042"}"#)
        .await;

    assert_eq!(
        response,
        "Failed to spawn agent: session already exists: factory-TC-042"
    );
    assert!(ctx.ids().await.is_empty());
}

#[tokio::test]
async fn kill_by_display_name_terminates_session() {
    let ctx = setup();
    ctx.command(r#"{"command":"spawn","agent_type":"factory","task_id":"TC-042"}"#)
        .await;

    let response = ctx
        .command(r#"{"command":"kill","identifier":"FA-S-042"}"#)
        .await;

    assert_eq!(response, "Agent FA-S-042 terminated successfully");
    assert!(!ctx.sessions.get_session("factory-TC-042").unwrap().alive);
    assert!(ctx.ids().await.is_empty());
    assert!(ctx.presenter.live_terminals().is_empty());
}

#[tokio::test]
async fn kill_unknown_agent_reports_not_found() {
    let ctx = setup();

    let response = ctx
        .command(r#"{"command":"kill","identifier":"nobody"}"#)
        .await;

    assert_eq!(response, "Agent nobody not found");
    assert!(ctx.sessions.calls().is_empty());
}

#[tokio::test]
async fn register_current_terminal_uses_supplied_identity() {
    let ctx = setup();

    let response = ctx
        .command(
            r#"{"command":"register_current_terminal","session_name":"factory-TC-007","agent_type":"factory","model":"haiku"}"#,
        )
        .await;

    assert_eq!(
        response,
        "Registered current terminal as agent: factory-TC-007 (FA-H-007)"
    );
    let summary = ctx.summary("factory-TC-007").await;
    assert_eq!(summary.origin, RecordOrigin::Registered);
    assert!(summary.monitored);
}

#[tokio::test]
async fn register_twice_reports_already_registered() {
    let ctx = setup();
    let json = r#"{"command":"register_current_terminal","session_name":"qa-alpha","agent_type":"qa"}"#;
    ctx.command(json).await;

    let response = ctx.command(json).await;

    assert_eq!(response, "Terminal already registered as agent: qa-alpha");
    assert_eq!(ctx.presenter.live_terminals().len(), 1);
}

#[tokio::test]
async fn create_terminal_attaches_to_live_session() {
    let ctx = setup();
    ctx.sessions
        .add_session_in("weaver-TC-12", "/work/weaver", true);

    let response = ctx
        .command(r#"{"command":"create_terminal","session_name":"weaver-TC-12"}"#)
        .await;

    assert_eq!(
        response,
        "Terminal created and attached: WE-S-12 (weaver-TC-12)"
    );
    let summary = ctx.summary("weaver-TC-12").await;
    assert_eq!(summary.origin, RecordOrigin::Attached);
    assert!(summary.has_terminal);
}

#[tokio::test]
async fn create_terminal_requires_live_session() {
    let ctx = setup();

    let response = ctx
        .command(r#"{"command":"create_terminal","session_name":"qa-alpha"}"#)
        .await;

    assert_eq!(
        response,
        "Failed to create terminal: session not found: qa-alpha"
    );
    assert!(ctx.ids().await.is_empty());
}

#[tokio::test]
async fn update_state_transitions_and_notifies() {
    let ctx = setup();
    ctx.command(r#"{"command":"spawn","agent_type":"qa","task_id":"TC-9"}"#)
        .await;

    let response = ctx
        .command(r#"{"command":"update_state","identifier":"qa-TC-9","state":"done"}"#)
        .await;

    assert_eq!(response, "Agent qa-TC-9 is now done");
    assert_eq!(ctx.summary("qa-TC-9").await.state, LifecycleState::Done);
    assert_eq!(ctx.notifier.bodies(), vec!["🟢 Agent QA-S-9 is now done"]);
}

#[tokio::test]
async fn update_state_rejects_unknown_state() {
    let ctx = setup();
    ctx.command(r#"{"command":"spawn","agent_type":"qa","task_id":"TC-9"}"#)
        .await;

    let response = ctx
        .command(r#"{"command":"update_state","identifier":"qa-TC-9","state":"sleepy"}"#)
        .await;

    assert_eq!(response, "Failed to update state: unknown state: sleepy");
    assert_eq!(ctx.summary("qa-TC-9").await.state, LifecycleState::Idle);
}

#[tokio::test]
async fn update_state_after_stop_is_refused() {
    let ctx = setup();
    ctx.command(r#"{"command":"spawn","agent_type":"qa","task_id":"TC-9"}"#)
        .await;
    ctx.command(r#"{"command":"update_state","identifier":"qa-TC-9","state":"stopped"}"#)
        .await;

    let response = ctx
        .command(r#"{"command":"update_state","identifier":"qa-TC-9","state":"busy"}"#)
        .await;

    assert_eq!(
        response,
        "Failed to update state: session qa-TC-9 is stopped; no further transitions"
    );
}

#[tokio::test]
async fn refresh_reports_reconcile_counts() {
    let ctx = setup();
    ctx.sessions.add_session("qa-alpha", true);
    ctx.write_state(r#"{"sessions":{"qa-alpha":"busy","weaver-echo":"busy"}}"#);

    let response = ctx.command(r#"{"command":"refresh"}"#).await;

    assert_eq!(response, "Refreshed: 0 kept, 1 discovered, 0 dropped");
}

#[tokio::test]
async fn unknown_and_malformed_commands_get_responses() {
    let ctx = setup();
    ctx.write_command("a.json", r#"{"command":"dance"}"#);
    ctx.write_command("b.json", "not json");

    assert_eq!(ctx.engine.bridge_tick().await, 2);

    assert_eq!(ctx.response("a.json").unwrap(), "Unknown command: dance");
    assert!(ctx
        .response("b.json")
        .unwrap()
        .starts_with("Invalid command file: "));
    assert!(!ctx.config.command_dir.join("a.json").exists());
    assert!(!ctx.config.command_dir.join("b.json").exists());
}

#[tokio::test]
async fn bridge_tick_without_directory_is_idle() {
    let ctx = setup();
    assert_eq!(ctx.engine.bridge_tick().await, 0);
}
