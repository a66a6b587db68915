//! `mw trigger` specs: trigger files written without the daemon

use crate::prelude::*;

#[test]
fn writes_trigger_file() {
    let ws = Workspace::empty();

    ws.mw()
        .args(&["trigger", "qa-alpha", "done"])
        .passes()
        .stdout_eq("Requested done for qa-alpha\n");

    let content = std::fs::read_to_string(ws.trigger_dir().join("qa-alpha.trigger")).unwrap();
    let (state, timestamp) = content.split_once(':').unwrap();
    assert_eq!(state, "done");
    assert!(timestamp.parse::<u64>().is_ok(), "{content}");
}

#[test]
fn display_name_is_recorded() {
    let ws = Workspace::empty();

    ws.mw()
        .args(&["trigger", "factory-TC-7", "busy", "--display-name", "FA-O-007"])
        .passes();

    let content =
        std::fs::read_to_string(ws.trigger_dir().join("factory-TC-7.trigger")).unwrap();
    assert!(content.starts_with("busy:"), "{content}");
    assert!(content.ends_with(":FA-O-007"), "{content}");
}

#[test]
fn hooks_dir_override_is_honoured() {
    let ws = Workspace::empty();

    ws.mw()
        .env("MW_HOOKS_DIR", "hooks")
        .args(&["trigger", "qa-alpha", "error"])
        .passes();

    assert!(ws.path().join("hooks/state_updates/qa-alpha.trigger").exists());
}

#[test]
fn stopped_cannot_be_triggered() {
    let ws = Workspace::empty();

    ws.mw()
        .args(&["trigger", "qa-alpha", "stopped"])
        .fails()
        .stderr_has("state cannot be triggered: stopped");

    assert!(!ws.trigger_dir().exists());
}

#[test]
fn unsafe_session_names_are_rejected() {
    let ws = Workspace::empty();

    ws.mw()
        .args(&["trigger", "../escape", "done"])
        .fails()
        .stderr_has("invalid session identifier");
}
