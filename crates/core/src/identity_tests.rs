// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

fn agent(raw: &str) -> ResolvedIdentity {
    match resolve(raw) {
        Identity::Agent(id) => id,
        Identity::Other => panic!("{raw} resolved to Other"),
    }
}

#[yare::parameterized(
    logical_opus        = { "FA-O-TC-12",        AgentKind::Factory,      Some(ModelTier::Opus) },
    logical_haiku       = { "QA-H-bravo",        AgentKind::Qa,           Some(ModelTier::Haiku) },
    full_prefix         = { "factory-TC-001",    AgentKind::Factory,      None },
    full_prefix_mixed   = { "Architect-alpha",   AgentKind::Architect,    None },
    featplanner         = { "featplanner-007",   AgentKind::Featplanner,  None },
    planner             = { "planner-x",         AgentKind::Planner,      None },
    darkwingduck        = { "darkwingduck-zulu", AgentKind::Darkwingduck, None },
    legacy_dash         = { "we-echo",           AgentKind::Weaver,       None },
    legacy_underscore   = { "SE_kilo",           AgentKind::Security,     None },
    legacy_digits       = { "fa123",             AgentKind::Factory,      None },
    legacy_bare         = { "DD",                AgentKind::Darkwingduck, None },
)]
fn resolves_kind_and_model(raw: &str, kind: AgentKind, model: Option<ModelTier>) {
    let id = agent(raw);
    assert_eq!(id.kind, kind);
    assert_eq!(id.model, model);
}

#[yare::parameterized(
    plain_shell     = { "main" },
    word_with_code  = { "session1" },
    web             = { "web" },
    unknown_logical = { "ZZ-S-alpha" },
    empty           = { "" },
)]
fn resolves_other(raw: &str) {
    assert_eq!(resolve(raw), Identity::Other);
}

#[test]
fn logical_name_with_unknown_tier_falls_back_to_kind_prefix() {
    // X is not a tier letter, so this is only a `qa-` prefix.
    let id = agent("QA-X-1");
    assert_eq!(id.kind, AgentKind::Qa);
    assert_eq!(id.model, None);
    assert_eq!(id.suffix.as_deref(), Some("X-1"));
}

#[yare::parameterized(
    tc          = { "factory-TC-001",     Some("TC-001"),    None,          None },
    dc          = { "qa-DC-42",           Some("DC-42"),     None,          None },
    ts          = { "planner-17-TS-auth", Some("17-TS-auth"), None,         None },
    coded       = { "weaver-AB-9",        Some("AB-9"),      None,          None },
    three_digit = { "factory-123",        Some("123"),       None,          None },
    phonetic    = { "architect-Alpha",    None,              Some("alpha"), None },
    opaque      = { "security-audit",     None,              None,          Some("audit") },
    four_digit  = { "factory-1234",       None,              None,          Some("1234") },
)]
fn classifies_remainder(
    raw: &str,
    task: Option<&str>,
    phonetic: Option<&str>,
    suffix: Option<&str>,
) {
    let id = agent(raw);
    assert_eq!(id.task_id.as_deref(), task);
    assert_eq!(id.phonetic.as_deref(), phonetic);
    assert_eq!(id.suffix.as_deref(), suffix);
}

#[yare::parameterized(
    tc_task          = { "factory-TC-001",     "FA-S-001" },
    phonetic         = { "architect-alpha",    "AR-S-alpha" },
    ts_task          = { "planner-17-TS-auth", "PL-S-17" },
    coded_task       = { "weaver-AB-9",        "WE-S-9" },
    three_digit      = { "qa-042",             "QA-S-042" },
    logical_opus     = { "SE-O-bravo",         "SE-O-bravo" },
    long_phonetic    = { "qa-november",        "QA-S-novem" },
    opaque_digits    = { "factory-run98765",   "FA-S-765" },
    opaque_chars     = { "security-audit",     "SE-S-dit" },
    no_remainder     = { "DD",                 "DD-S-DD" },
)]
fn display_names(raw: &str, expected: &str) {
    assert_eq!(resolve(raw).display_name(raw), expected);
}

#[yare::parameterized(
    short_literal = { Some("ab"),           "FA-S-ab" },
    verbatim_mid  = { Some("abcd"),         "FA-S-abcd" },
    long_prefix   = { Some("refactoring"),  "FA-S-ref" },
    ts_digits     = { Some("5-TS-x"),       "FA-S-5" },
    coded_digits  = { Some("TC-77"),        "FA-S-77" },
    empty_source  = { Some(""),             "FA-S-abc" },
    none          = { None,                 "FA-S-abc" },
)]
fn display_name_suffix_rules(source: Option<&str>, expected: &str) {
    assert_eq!(
        display_name("xyzabc", AgentKind::Factory, ModelTier::Sonnet, source),
        expected
    );
}

#[test]
fn other_sessions_display_their_identifier() {
    assert_eq!(resolve("main").display_name("main"), "main");
    assert_eq!(resolve("main").emoji(), "📟");
}

#[test]
fn model_hint_fills_only_missing_tier() {
    let hinted = resolve("factory-alpha").with_model_hint(Some(ModelTier::Opus));
    assert_eq!(hinted.display_name("factory-alpha"), "FA-O-alpha");

    let encoded = resolve("FA-H-alpha").with_model_hint(Some(ModelTier::Opus));
    assert_eq!(encoded.display_name("FA-H-alpha"), "FA-H-alpha");

    assert_eq!(resolve("main").with_model_hint(Some(ModelTier::Opus)), Identity::Other);
}

#[test]
fn explicit_task_is_kept_as_task() {
    let id = ResolvedIdentity::explicit(AgentKind::Qa, Some("login-flow".into()), None);
    assert_eq!(id.task_id.as_deref(), Some("login-flow"));
    assert_eq!(id.display_name("qa-login-flow"), "QA-S-log");

    let id = ResolvedIdentity::explicit(AgentKind::Qa, Some("charlie".into()), None);
    assert_eq!(id.phonetic.as_deref(), Some("charlie"));
}

#[test]
fn phonetic_allocation_skips_taken_words() {
    assert_eq!(next_phonetic_token([]), "alpha");
    assert_eq!(next_phonetic_token(["alpha", "bravo"]), "charlie");
    assert_eq!(next_phonetic_token(["Alpha"]), "bravo");
}

#[test]
fn phonetic_allocation_falls_back_to_numbered_words() {
    let mut taken: Vec<&str> = PHONETIC_ALPHABET.to_vec();
    assert_eq!(next_phonetic_token(taken.iter().copied()), "alpha2");
    taken.push("alpha2");
    assert_eq!(next_phonetic_token(taken.iter().copied()), "bravo2");
}

#[test]
fn identity_serializes_with_type_tag() {
    let json = serde_json::to_value(resolve("FA-O-TC-1")).unwrap();
    assert_eq!(json["type"], "agent");
    assert_eq!(json["kind"], "factory");
    assert_eq!(json["model"], "opus");
    assert_eq!(json["task_id"], "TC-1");
    let other = serde_json::to_value(resolve("main")).unwrap();
    assert_eq!(other["type"], "other");
}

proptest! {
    #[test]
    fn ts_task_suffix_is_numeric_prefix(n in "[0-9]{1,5}", tail in "[a-z]{1,12}") {
        let task = format!("{n}-TS-{tail}");
        let raw = format!("factory-{task}");
        let id = agent(&raw);
        prop_assert_eq!(id.task_id.as_deref(), Some(task.as_str()));
        let name = id.display_name(&raw);
        prop_assert!(name.chars().count() <= MAX_DISPLAY_NAME_LEN);
        prop_assert_eq!(name.rsplit('-').next(), Some(n.as_str()));
    }

    #[test]
    fn display_name_is_bounded_and_deterministic(raw in "[A-Za-z0-9_.-]{1,40}") {
        let first = resolve(&raw).display_name(&raw);
        let second = resolve(&raw).display_name(&raw);
        prop_assert_eq!(&first, &second);
        if resolve(&raw).agent().is_some() {
            prop_assert!(first.chars().count() <= MAX_DISPLAY_NAME_LEN);
        }
    }

    #[test]
    fn logical_names_round_trip_kind_and_tier(
        kind_idx in 0usize..8,
        tier_idx in 0usize..3,
        rest in "(alpha|TC-[0-9]{1,3}|[0-9]{3}|zulu)",
    ) {
        let kind = AgentKind::ALL[kind_idx];
        let tier = ModelTier::ALL[tier_idx];
        let raw = format!("{}-{}-{}", kind.short_code(), tier.letter(), rest);
        let display = resolve(&raw).display_name(&raw);
        let back = agent(&display);
        prop_assert_eq!(back.kind, kind);
        prop_assert_eq!(back.model, Some(tier));
    }
}
