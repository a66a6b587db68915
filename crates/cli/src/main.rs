// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mw - muxwatch CLI
//!
//! Thin client for `mwd`: agent commands travel through the file-based
//! command bridge, trigger requests are written directly, and identifiers
//! are resolved locally.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod bridge;
mod commands;
mod env;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{agent, resolve, trigger};
use mw_core::BridgeCommand;
use output::OutputFormat;

use crate::bridge::BridgeClient;

#[derive(Parser)]
#[command(
    name = "mw",
    version,
    about = "muxwatch - agent sessions mirrored into the terminal multiplexer"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch a new agent session
    Spawn(agent::SpawnArgs),
    /// Kill an agent session and close its terminal
    Kill(agent::KillArgs),
    /// Register an existing session as an agent
    Register(agent::RegisterArgs),
    /// Open a terminal attached to a live session
    Attach(agent::AttachArgs),
    /// Re-run discovery against the multiplexer
    Refresh,
    /// Set an agent's lifecycle state
    SetState(agent::SetStateArgs),
    /// Request a state change via a trigger file (no daemon round trip)
    Trigger(trigger::TriggerArgs),
    /// Show the display name and identity for an identifier
    Resolve(resolve::ResolveArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(1);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// When the top-level message already contains every source message the
/// "Caused by" chain is skipped; otherwise it is rendered like anyhow's Debug.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let request: BridgeCommand = match command {
        Commands::Resolve(args) => return resolve::handle(args, format),
        Commands::Trigger(args) => return trigger::handle(args, &env::trigger_dir()?, format),
        Commands::Spawn(args) => args.into(),
        Commands::Kill(args) => args.into(),
        Commands::Register(args) => args.into(),
        Commands::Attach(args) => args.into(),
        Commands::SetState(args) => args.into(),
        Commands::Refresh => BridgeCommand::Refresh {},
    };
    agent::handle(request, &BridgeClient::from_env()?, format).await
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
