//! mwd lifecycle specs: single instance, bridge round trip, clean shutdown

use crate::prelude::*;

#[test]
fn daemon_writes_pid_and_log() {
    let mut ws = Workspace::empty();
    ws.start_daemon();

    let pid = std::fs::read_to_string(ws.state_path().join("daemon.pid")).unwrap();
    assert!(pid.trim().parse::<u32>().is_ok(), "{pid}");
    assert!(ws.daemon_log().contains("--- mwd: starting (pid: "));
}

#[test]
fn second_daemon_refuses_to_start() {
    let mut ws = Workspace::empty();
    ws.start_daemon();

    ws.mwd().fails().stderr_has("mwd is already running");
}

#[test]
fn bridge_commands_get_answers() {
    let mut ws = Workspace::empty();
    ws.start_daemon();

    ws.mw()
        .args(&["kill", "nobody-here"])
        .passes()
        .stdout_eq("Agent nobody-here not found\n");
    ws.mw()
        .args(&["set-state", "nobody-here", "done"])
        .passes()
        .stdout_eq("Agent nobody-here not found\n");
}

#[test]
fn sigterm_removes_pid_file() {
    let mut ws = Workspace::empty();
    ws.start_daemon();
    let pid_file = ws.state_path().join("daemon.pid");
    assert!(pid_file.exists());

    let status = ws.stop_daemon().unwrap();

    assert!(status.success(), "{status:?}\n{}", ws.daemon_log());
    assert!(!pid_file.exists());
}
