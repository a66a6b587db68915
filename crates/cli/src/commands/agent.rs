// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent commands relayed to the daemon through the command bridge

use anyhow::Result;
use clap::Args;
use mw_core::BridgeCommand;
use serde::Serialize;

use crate::bridge::BridgeClient;
use crate::output::{self, OutputFormat};

#[derive(Args, Debug)]
pub struct SpawnArgs {
    /// Agent kind (e.g. factory, qa, planner)
    pub kind: String,
    /// Task identifier; a phonetic name is picked when omitted
    pub task: Option<String>,
    /// Model tier: opus, sonnet or haiku (default: sonnet)
    #[arg(long, short)]
    pub model: Option<String>,
}

#[derive(Args, Debug)]
pub struct KillArgs {
    /// Session identifier or display name
    pub identifier: String,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Existing multiplexer session to register
    pub session: String,
    /// Agent kind
    pub kind: String,
    #[arg(long)]
    pub task: Option<String>,
    #[arg(long, short)]
    pub model: Option<String>,
}

#[derive(Args, Debug)]
pub struct AttachArgs {
    /// Live multiplexer session to attach a terminal to
    pub session: String,
    /// Agent kind; inferred from the session name when omitted
    #[arg(long)]
    pub kind: Option<String>,
    #[arg(long)]
    pub task: Option<String>,
    #[arg(long, short)]
    pub model: Option<String>,
}

#[derive(Args, Debug)]
pub struct SetStateArgs {
    /// Session identifier or display name
    pub identifier: String,
    /// New lifecycle state (e.g. busy, done, stopped)
    pub state: String,
}

impl From<SpawnArgs> for BridgeCommand {
    fn from(args: SpawnArgs) -> Self {
        BridgeCommand::Spawn {
            agent_type: args.kind,
            task_id: args.task,
            model: args.model,
        }
    }
}

impl From<KillArgs> for BridgeCommand {
    fn from(args: KillArgs) -> Self {
        BridgeCommand::Kill {
            identifier: args.identifier,
        }
    }
}

impl From<RegisterArgs> for BridgeCommand {
    fn from(args: RegisterArgs) -> Self {
        BridgeCommand::RegisterCurrentTerminal {
            session_name: args.session,
            agent_type: args.kind,
            model: args.model,
            task_id: args.task,
        }
    }
}

impl From<AttachArgs> for BridgeCommand {
    fn from(args: AttachArgs) -> Self {
        BridgeCommand::CreateTerminal {
            session_name: args.session,
            agent_type: args.kind,
            model: args.model,
            task_id: args.task,
        }
    }
}

impl From<SetStateArgs> for BridgeCommand {
    fn from(args: SetStateArgs) -> Self {
        BridgeCommand::UpdateState {
            identifier: args.identifier,
            state: args.state,
        }
    }
}

#[derive(Debug, Serialize)]
struct Reply<'a> {
    command: &'a str,
    response: &'a str,
}

/// Send `command` and print the daemon's reply.
pub async fn handle(
    command: impl Into<BridgeCommand>,
    client: &BridgeClient,
    format: OutputFormat,
) -> Result<()> {
    let command = command.into();
    let response = client.send(&command).await?;
    let response = response.trim_end();
    output::print(
        format,
        response,
        &Reply {
            command: command.name(),
            response,
        },
    )
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
