//! Bridge command specs: command files and response handling

use std::time::Duration;

use crate::prelude::*;

/// Answer the first command file with `response`, returning its JSON body.
fn answer_one(dir: std::path::PathBuf, response: &'static str) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let mut found = None;
        let seen = wait_for(SPEC_WAIT_MAX_MS, || {
            found = std::fs::read_dir(&dir).ok().and_then(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|e| e.path())
                    .find(|p| p.extension().is_some_and(|ext| ext == "json"))
            });
            found.is_some()
        });
        assert!(seen, "no command file appeared in {}", dir.display());
        let file = found.unwrap();
        let body = std::fs::read_to_string(&file).unwrap();
        let mut response_path = file.clone().into_os_string();
        response_path.push(".response");
        std::fs::write(response_path, response).unwrap();
        std::fs::remove_file(&file).unwrap();
        body
    })
}

#[test]
fn spawn_prints_the_daemon_response() {
    let ws = Workspace::empty();
    let daemon = answer_one(
        ws.command_dir(),
        "Agent spawned: FA-O-042 (factory-TC-042)",
    );

    ws.mw()
        .args(&["spawn", "factory", "TC-042", "--model", "opus"])
        .passes()
        .stdout_eq("Agent spawned: FA-O-042 (factory-TC-042)\n");

    let body: serde_json::Value = serde_json::from_str(&daemon.join().unwrap()).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "command": "spawn",
            "agent_type": "factory",
            "task_id": "TC-042",
            "model": "opus",
        })
    );
}

#[test]
fn json_output_wraps_the_response() {
    let ws = Workspace::empty();
    let daemon = answer_one(ws.command_dir(), "Refreshed: 0 kept, 0 discovered, 0 dropped");

    let run = ws.mw().args(&["refresh", "-o", "json"]).passes();
    daemon.join().unwrap();

    let json: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(json["command"], "refresh");
    assert_eq!(json["response"], "Refreshed: 0 kept, 0 discovered, 0 dropped");
}

#[test]
fn missing_response_times_out() {
    let ws = Workspace::empty();

    let run = ws
        .mw()
        .env("MW_TIMEOUT_RESPONSE_MS", "100")
        .args(&["kill", "qa-alpha"])
        .fails()
        .stderr_has("no response from mwd within 100ms");

    assert_eq!(run.code(), Some(1));
    // The abandoned command is withdrawn
    std::thread::sleep(Duration::from_millis(20));
    let leftovers = std::fs::read_dir(ws.command_dir()).unwrap().count();
    assert_eq!(leftovers, 0);
}
