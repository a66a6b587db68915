// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mw_engine::CommandBridge;

fn client(dir: &Path, timeout_ms: u64) -> BridgeClient {
    BridgeClient::new(
        dir,
        Duration::from_millis(5),
        Duration::from_millis(timeout_ms),
    )
}

fn kill(identifier: &str) -> BridgeCommand {
    BridgeCommand::Kill {
        identifier: identifier.to_string(),
    }
}

/// Answer the first command that shows up, echoing its name.
async fn answer_once(dir: PathBuf) {
    let inbox = CommandBridge::new(dir);
    loop {
        let pending = inbox.pending().await.unwrap();
        if let Some(file) = pending.first() {
            let text = std::fs::read_to_string(file).unwrap();
            let command = BridgeCommand::parse(&text).unwrap();
            inbox
                .respond(file, &format!("handled {}", command.name()))
                .await
                .unwrap();
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}

#[test]
fn submit_writes_a_decodable_command_file() {
    let dir = tempfile::tempdir().unwrap();
    let inbox = dir.path().join("commands");

    let path = client(&inbox, 100).submit(&kill("FA-S-042")).unwrap();

    assert!(path.starts_with(&inbox));
    assert!(path.to_string_lossy().ends_with("-kill.json"));
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(BridgeCommand::parse(&text).unwrap(), kill("FA-S-042"));

    // No staging files left behind
    let entries: Vec<_> = std::fs::read_dir(&inbox).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn command_file_names_are_unique_and_ordered() {
    let dir = tempfile::tempdir().unwrap();
    let client = client(dir.path(), 100);

    let first = client.submit(&BridgeCommand::Refresh {}).unwrap();
    let second = client.submit(&BridgeCommand::Refresh {}).unwrap();

    assert_ne!(first, second);
    assert!(first < second);
}

#[tokio::test]
async fn send_returns_the_daemon_response() {
    let dir = tempfile::tempdir().unwrap();
    let daemon = tokio::spawn(answer_once(dir.path().to_path_buf()));

    let text = client(dir.path(), 5_000)
        .send(&kill("qa-alpha"))
        .await
        .unwrap();
    daemon.await.unwrap();

    assert_eq!(text, "handled kill");
    // Both the command and its response are consumed
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn send_times_out_and_withdraws_the_command() {
    let dir = tempfile::tempdir().unwrap();

    let err = client(dir.path(), 30)
        .send(&BridgeCommand::Refresh {})
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::Timeout(_)), "{err}");
    assert_eq!(
        err.to_string(),
        "no response from mwd within 30ms (is mwd running?)"
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
