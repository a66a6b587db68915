// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-bridge wire format.
//!
//! A command file is a JSON object with a `command` tag and snake_case
//! arguments, e.g. `{"command":"spawn","agent_type":"factory","task_id":"TC-1"}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request dropped into the command directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum BridgeCommand {
    Spawn {
        agent_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        task_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
    Kill {
        identifier: String,
    },
    RegisterCurrentTerminal {
        session_name: String,
        agent_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        task_id: Option<String>,
    },
    CreateTerminal {
        session_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        agent_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        task_id: Option<String>,
    },
    UpdateState {
        identifier: String,
        state: String,
    },
    Refresh {},
}

/// Why a command file could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum CommandParseError {
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Invalid command file: {0}")]
    Invalid(String),
}

impl BridgeCommand {
    /// Decode a command file, distinguishing unknown commands from bad files.
    pub fn parse(text: &str) -> Result<Self, CommandParseError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| CommandParseError::Invalid(e.to_string()))?;
        let name = match value.get("command") {
            Some(Value::String(name)) => name.clone(),
            Some(other) => return Err(CommandParseError::Unknown(other.to_string())),
            None => return Err(CommandParseError::Invalid("missing \"command\"".to_string())),
        };
        if !Self::NAMES.contains(&name.as_str()) {
            return Err(CommandParseError::Unknown(name));
        }
        serde_json::from_value(value).map_err(|e| CommandParseError::Invalid(e.to_string()))
    }

    pub const NAMES: [&'static str; 6] = [
        "spawn",
        "kill",
        "register_current_terminal",
        "create_terminal",
        "update_state",
        "refresh",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BridgeCommand::Spawn { .. } => "spawn",
            BridgeCommand::Kill { .. } => "kill",
            BridgeCommand::RegisterCurrentTerminal { .. } => "register_current_terminal",
            BridgeCommand::CreateTerminal { .. } => "create_terminal",
            BridgeCommand::UpdateState { .. } => "update_state",
            BridgeCommand::Refresh {} => "refresh",
        }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
