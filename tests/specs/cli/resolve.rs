//! `mw resolve` specs: offline identifier resolution

use crate::prelude::*;

#[test]
fn resolves_task_sessions() {
    cli()
        .args(&["resolve", "factory-TC-001"])
        .passes()
        .stdout_eq("🏭 FA-S-001 (factory, sonnet, task TC-001)\n");
}

#[test]
fn model_hint_fills_missing_tier() {
    cli()
        .args(&["resolve", "factory-TC-001", "--model", "opus"])
        .passes()
        .stdout_eq("🏭 FA-O-001 (factory, opus, task TC-001)\n");
}

#[test]
fn non_agent_sessions_keep_their_name() {
    cli()
        .args(&["resolve", "main"])
        .passes()
        .stdout_eq("📟 main (not an agent session)\n");
}

#[test]
fn json_output() {
    let run = cli()
        .args(&["resolve", "qa-alpha", "-o", "json"])
        .passes();
    let json: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(json["display_name"], "QA-S-alpha");
    assert_eq!(json["identity"]["kind"], "qa");
    assert_eq!(json["identity"]["phonetic"], "alpha");
}
