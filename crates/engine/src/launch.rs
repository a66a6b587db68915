// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launch command templates
//!
//! Templates use `${name}` placeholders: `kind`, `task`, `model`, `session`
//! and `workspace`. Unknown placeholders are left as-is; an absent task
//! renders as empty.

use mw_core::{AgentKind, ModelTier, SessionId};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// What a launch command is rendered for.
#[derive(Debug, Clone, Copy)]
pub struct LaunchRequest<'a> {
    pub kind: AgentKind,
    pub task_id: Option<&'a str>,
    pub model: ModelTier,
    pub session_id: &'a SessionId,
    pub workspace: &'a Path,
}

/// Escape a string for use inside shell double quotes.
fn escape_for_shell(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '$' => result.push_str("\\$"),
            '`' => result.push_str("\\`"),
            '"' => result.push_str("\\\""),
            _ => result.push(c),
        }
    }
    result
}

/// Render `template` for `request`, collapsing the gap left by an empty task.
pub fn render_launch_command(template: &str, request: &LaunchRequest<'_>) -> String {
    let vars: HashMap<&str, String> = HashMap::from([
        ("kind", request.kind.name().to_string()),
        ("task", request.task_id.unwrap_or_default().to_string()),
        ("model", request.model.name().to_string()),
        ("session", request.session_id.to_string()),
        ("workspace", request.workspace.display().to_string()),
    ]);

    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;
    // Set after an empty value that already follows a separator
    let mut skip_gap = false;
    for caps in VAR_PATTERN.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_literal(&mut rendered, &template[last..whole.start()], skip_gap);
        last = whole.end();
        let value = match vars.get(&caps[1]) {
            Some(value) => escape_for_shell(value),
            None => whole.as_str().to_string(),
        };
        skip_gap = value.is_empty() && rendered.chars().last().is_none_or(char::is_whitespace);
        rendered.push_str(&value);
    }
    let rest = &template[last..];
    if skip_gap && rest.trim().is_empty() {
        rendered.truncate(rendered.trim_end().len());
    }
    push_literal(&mut rendered, rest, skip_gap);
    rendered
}

fn push_literal(out: &mut String, literal: &str, skip_gap: bool) {
    if skip_gap {
        out.push_str(literal.trim_start());
    } else {
        out.push_str(literal);
    }
}

#[cfg(test)]
#[path = "launch_tests.rs"]
mod tests;
