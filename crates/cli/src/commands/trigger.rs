// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mw trigger` - request a state change through a trigger file
//!
//! Writes `<trigger_dir>/<session>.trigger` directly; the daemon picks it up
//! on its next monitor tick, so no daemon round trip is needed.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use mw_core::{SessionId, TriggerSignal};
use serde::Serialize;

use crate::output::{self, OutputFormat};

#[derive(Args, Debug)]
pub struct TriggerArgs {
    /// Session identifier or display name
    pub session: String,
    /// Requested state (idle, busy, done, error)
    pub state: String,
    /// Rename the agent's terminal at the same time
    #[arg(long)]
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct Written<'a> {
    path: &'a Path,
    content: &'a str,
}

/// Validate the request and build the signal to write.
pub fn build_signal(args: &TriggerArgs, timestamp: u64) -> Result<(SessionId, TriggerSignal)> {
    let session = SessionId::parse(args.session.as_str())?;
    let requested = Some(args.state.as_str())
        .filter(|state| !state.contains(':'))
        .and_then(TriggerSignal::parse);
    let Some(requested) = requested else {
        bail!("state cannot be triggered: {}", args.state);
    };
    let mut signal = TriggerSignal::new(requested.state, timestamp.to_string());
    if let Some(name) = args.display_name.as_deref().filter(|n| !n.is_empty()) {
        if name.contains([':', '\n', '\r']) {
            bail!("display name may not contain ':' or line breaks: {name:?}");
        }
        signal = signal.with_display_name(name);
    }
    Ok((session, signal))
}

/// Write the trigger file under `dir`, replacing any pending one.
pub fn write(dir: &Path, session: &SessionId, content: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(format!("{session}.trigger"));
    let staging = dir.join(format!(".{session}.trigger.tmp"));
    std::fs::write(&staging, content)
        .with_context(|| format!("failed to write {}", staging.display()))?;
    std::fs::rename(&staging, &path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

pub fn handle(args: TriggerArgs, dir: &Path, format: OutputFormat) -> Result<()> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let (session, signal) = build_signal(&args, now)?;
    let content = signal.to_string();
    let path = write(dir, &session, &content)?;
    output::print(
        format,
        &format!("Requested {} for {session}", signal.state),
        &Written {
            path: &path,
            content: &content,
        },
    )
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
