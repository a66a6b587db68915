// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mw_core::test_support::sid;
use mw_core::{resolve, HealthState, LifecycleState, ViewSource};

fn view(raw: &str, state: LifecycleState) -> SessionView {
    let id = sid(raw);
    let identity = resolve(raw);
    let display = identity.display_name(raw);
    SessionView::render(&ViewSource {
        session_id: &id,
        identity: &identity,
        display_name: &display,
        state,
        health: HealthState::Healthy,
        issues: &[],
        cwd: None,
    })
}

#[tokio::test]
async fn status_line_tracks_show_and_hide() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("status.txt");
    let presentation = TmuxPresentation::new(Some(path.clone()));

    presentation
        .show_status(&view("factory-TC-001", LifecycleState::Busy))
        .await
        .unwrap();
    presentation
        .show_status(&view("qa-alpha", LifecycleState::Idle))
        .await
        .unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "🏭001● 🔍alpha○\n"
    );

    presentation
        .show_status(&view("factory-TC-001", LifecycleState::Done))
        .await
        .unwrap();
    assert_eq!(presentation.status_line(), "🏭001✓ 🔍alpha○");

    presentation.hide_status(&sid("factory-TC-001")).await.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "🔍alpha○\n");
    assert!(!dir.path().join("status.tmp").exists());
}

#[tokio::test]
async fn hide_unknown_status_is_noop() {
    let presentation = TmuxPresentation::new(None);
    presentation.hide_status(&sid("ghost")).await.unwrap();
    assert_eq!(presentation.status_line(), "");
}

#[tokio::test]
async fn status_file_parent_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/state/status.txt");
    let presentation = TmuxPresentation::new(Some(path.clone()));
    presentation
        .show_status(&view("weaver-echo", LifecycleState::Error))
        .await
        .unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "🕸️echo✗\n");
}

#[yare::parameterized(
    plain  = { "qa-alpha", "=qa-alpha:" },
    dotted = { "factory.TC-001", "=factory.TC-001:" },
)]
fn window_target_names_the_session(raw: &str, expected: &str) {
    assert_eq!(window_target(&sid(raw)), expected);
}
