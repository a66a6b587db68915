// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-based command bridge.
//!
//! External tools drop `*.json` command files into the bridge directory.
//! Each is processed once: a sibling `<file>.response` text file is written
//! and the command file deleted.

use std::path::{Path, PathBuf};

/// Suffix appended to a command file's name for its response.
pub const RESPONSE_SUFFIX: &str = ".response";

/// Directory-backed command inbox.
#[derive(Debug, Clone)]
pub struct CommandBridge {
    dir: PathBuf,
}

impl CommandBridge {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Command files awaiting processing, oldest name first.
    ///
    /// A missing directory has no pending commands.
    pub async fn pending(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if is_command_file(&path) && entry.file_type().await.is_ok_and(|t| t.is_file()) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Write the response for `command_file`, then delete the command file.
    pub async fn respond(&self, command_file: &Path, message: &str) -> std::io::Result<()> {
        tokio::fs::write(response_path(command_file), message).await?;
        match tokio::fs::remove_file(command_file).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// `<file>.response` next to a command file.
pub fn response_path(command_file: &Path) -> PathBuf {
    let mut name = command_file.as_os_str().to_owned();
    name.push(RESPONSE_SUFFIX);
    PathBuf::from(name)
}

fn is_command_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".json") && !name.ends_with(".response.json")
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
