// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn terminal_id_serializes_as_plain_string() {
    let id = TerminalId::new("term-7");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"term-7\"");
    assert_eq!(id.to_string(), "term-7");
}

#[test]
fn generator_counts_up_from_one() {
    let ids = TerminalIdGen::new("tmux");
    assert_eq!(ids.next(), *"tmux-1");
    assert_eq!(ids.next().as_str(), "tmux-2");
}

#[test]
fn generator_clones_share_counter() {
    let ids = TerminalIdGen::new("term");
    let other = ids.clone();
    assert_eq!(ids.next(), *"term-1");
    assert_eq!(other.next(), *"term-2");
}
