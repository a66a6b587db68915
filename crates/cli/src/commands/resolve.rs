// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mw resolve` - show how an identifier is named, without the daemon

use anyhow::Result;
use clap::Args;
use mw_core::{Identity, ModelTier};
use serde::Serialize;

use crate::output::{self, OutputFormat};

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Session identifier (e.g. factory-TC-001, FA-O-042, qa-alpha)
    pub identifier: String,
    /// Model tier to assume when the identifier carries none
    #[arg(long, short)]
    pub model: Option<ModelTier>,
}

#[derive(Debug, Serialize)]
pub struct Resolution {
    pub session_id: String,
    pub display_name: String,
    pub emoji: &'static str,
    pub identity: Identity,
}

pub fn resolve(args: &ResolveArgs) -> Resolution {
    let identity = mw_core::resolve(&args.identifier).with_model_hint(args.model);
    Resolution {
        display_name: identity.display_name(&args.identifier),
        emoji: identity.emoji(),
        session_id: args.identifier.clone(),
        identity,
    }
}

/// One-line text rendering.
pub fn describe(resolution: &Resolution) -> String {
    let Some(agent) = resolution.identity.agent() else {
        return format!(
            "{} {} (not an agent session)",
            resolution.emoji, resolution.display_name
        );
    };
    let mut details = vec![
        agent.kind.to_string(),
        agent.model_or_default().to_string(),
    ];
    if let Some(task) = &agent.task_id {
        details.push(format!("task {task}"));
    } else if let Some(phonetic) = &agent.phonetic {
        details.push(format!("phonetic {phonetic}"));
    }
    format!(
        "{} {} ({})",
        resolution.emoji,
        resolution.display_name,
        details.join(", ")
    )
}

pub fn handle(args: ResolveArgs, format: OutputFormat) -> Result<()> {
    let resolution = resolve(&args);
    output::print(format, &describe(&resolution), &resolution)
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
