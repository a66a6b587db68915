// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn args(identifier: &str, model: Option<ModelTier>) -> ResolveArgs {
    ResolveArgs {
        identifier: identifier.to_string(),
        model,
    }
}

#[yare::parameterized(
    task      = { "factory-TC-001", None,                   "🏭 FA-S-001 (factory, sonnet, task TC-001)" },
    phonetic  = { "qa-alpha",       None,                   "🔍 QA-S-alpha (qa, sonnet, phonetic alpha)" },
    hinted    = { "factory-TC-001", Some(ModelTier::Opus),  "🏭 FA-O-001 (factory, opus, task TC-001)" },
    encoded   = { "FA-H-alpha",     Some(ModelTier::Opus),  "🏭 FA-H-alpha (factory, haiku, phonetic alpha)" },
    opaque    = { "security-audit", None,                   "🛡️ SE-S-dit (security, sonnet)" },
    other     = { "main",           None,                   "📟 main (not an agent session)" },
)]
fn describes_identifiers(identifier: &str, model: Option<ModelTier>, expected: &str) {
    assert_eq!(describe(&resolve(&args(identifier, model))), expected);
}

#[test]
fn json_carries_identity_fields() {
    let resolution = resolve(&args("FA-O-TC-1", None));

    let json = serde_json::to_value(&resolution).unwrap();

    assert_eq!(json["session_id"], "FA-O-TC-1");
    assert_eq!(json["display_name"], "FA-O-1");
    assert_eq!(json["identity"]["type"], "agent");
    assert_eq!(json["identity"]["kind"], "factory");
    assert_eq!(json["identity"]["task_id"], "TC-1");
}

#[test]
fn model_flag_parses_tier_names() {
    use clap::Parser;

    let cli = crate::Cli::try_parse_from(["mw", "resolve", "qa-alpha", "--model", "Haiku"]).unwrap();
    let Some(crate::Commands::Resolve(args)) = cli.command else {
        panic!("expected resolve");
    };
    assert_eq!(args.model, Some(ModelTier::Haiku));
    assert!(crate::Cli::try_parse_from(["mw", "resolve", "qa-alpha", "-m", "large"]).is_err());
}
