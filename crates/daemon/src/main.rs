// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! muxwatch daemon (mwd)
//!
//! Background process that mirrors agent sessions into the terminal
//! multiplexer.
//!
//! Architecture:
//! - Watcher task: debounced state-file loads, delivered as broadcast events
//! - Main loop: applies events, polls the command bridge and the monitor,
//!   and reconciles on SIGHUP

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod env;
mod lifecycle;

use std::path::Path;
use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::lifecycle::{Config, LifecycleError};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle info flags before any config/lock acquisition
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("mwd {VERSION}");
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("mwd {VERSION}");
                println!("muxwatch daemon - mirrors agent sessions into the terminal multiplexer");
                println!();
                println!("USAGE:");
                println!("    mwd");
                println!();
                println!("The daemon watches the workspace state file and the command bridge");
                println!("directory. Use `mw` to send it commands.");
                println!();
                println!("ENVIRONMENT:");
                println!("    MW_WORKSPACE     Workspace root (default: current directory)");
                println!("    MW_STATE_DIR     State directory (default: ~/.local/state/mw)");
                println!("    RUST_LOG         Log filter (default: info)");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: mwd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;

    rotate_log_if_needed(&config.log_path);

    // Write startup marker to log (before tracing setup, so it is never buffered)
    write_startup_marker(&config)?;

    let log_guard = setup_logging(&config)?;

    info!(
        workspace = %config.engine.workspace_root.display(),
        "Starting daemon"
    );

    let mut daemon = match lifecycle::startup(&config).await {
        Ok(daemon) => daemon,
        Err(LifecycleError::LockFailed(_)) => {
            let pid = std::fs::read_to_string(&config.lock_path)
                .unwrap_or_default()
                .trim()
                .to_string();
            eprintln!("mwd is already running");
            if !pid.is_empty() {
                eprintln!("  pid: {pid}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            // Write error synchronously (tracing is non-blocking and may not flush in time)
            write_startup_error(&config, &e);
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sighup = signal(SignalKind::hangup())?;

    // NOTE: intervals must be created outside the loop; select! re-evaluates
    // its branches on every iteration.
    let mut bridge_tick = tokio::time::interval(env::bridge_poll_interval());
    bridge_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut monitor_tick = tokio::time::interval(env::monitor_poll_interval());
    monitor_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        commands = %config.engine.command_dir.display(),
        "Daemon ready"
    );
    println!("READY");

    loop {
        tokio::select! {
            event = daemon.events.recv() => match event {
                Ok(event) => {
                    daemon.engine.apply_watch_event(event).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "state events lagged; next snapshot catches up");
                }
                Err(RecvError::Closed) => {
                    info!("State watcher closed, shutting down...");
                    break;
                }
            },

            _ = bridge_tick.tick() => {
                daemon.engine.bridge_tick().await;
            }

            _ = monitor_tick.tick() => {
                daemon.engine.monitor_tick().await;
            }

            // On-demand reconciliation; runs beside the loop and is
            // cancelled by shutdown
            _ = sighup.recv() => {
                if daemon.reconcile_task.as_ref().is_some_and(|t| !t.is_finished()) {
                    info!("Received SIGHUP, reconciliation already running");
                    continue;
                }
                info!("Received SIGHUP, reconciling");
                let engine = Arc::clone(&daemon.engine);
                daemon.reconcile_task = Some(tokio::spawn(async move {
                    let intent = engine.config().discovery;
                    match engine.reconcile(intent).await {
                        Ok(Some(report)) => info!(
                            kept = report.kept,
                            created = report.created,
                            dropped = report.dropped,
                            "reconciliation complete"
                        ),
                        Ok(None) => {}
                        Err(e) => warn!(error = %e, "reconciliation failed"),
                    }
                }));
            }

            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                break;
            }

            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                break;
            }
        }
    }

    daemon.shutdown().await;
    info!("Daemon stopped");
    Ok(())
}

/// Startup marker prefix written to log before anything else.
/// Full format: "--- mwd: starting (pid: 12345) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- mwd: starting (pid: ";

/// Logs larger than this are rotated at startup
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Rotated generations kept (`daemon.log.1` .. `daemon.log.3`)
const MAX_ROTATIONS: u32 = 3;

/// Rotate `path` to `path.1` (shifting older generations) when it is too big.
fn rotate_log_if_needed(path: &Path) {
    let Ok(meta) = std::fs::metadata(path) else {
        return;
    };
    if meta.len() <= MAX_LOG_SIZE {
        return;
    }
    let generation = |n: u32| {
        let mut name = path.as_os_str().to_owned();
        name.push(format!(".{n}"));
        std::path::PathBuf::from(name)
    };
    for n in (1..MAX_ROTATIONS).rev() {
        let from = generation(n);
        if from.exists() {
            let _ = std::fs::rename(&from, generation(n + 1));
        }
    }
    let _ = std::fs::rename(path, generation(1));
}

/// Write startup marker to log file (appends to existing log)
fn write_startup_marker(config: &Config) -> Result<(), LifecycleError> {
    use std::io::Write;

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    writeln!(file, "{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id())?;

    Ok(())
}

/// Write startup error synchronously to log file.
fn write_startup_error(config: &Config, error: &LifecycleError) {
    use std::io::Write;

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
    else {
        return;
    };
    let _ = writeln!(file, "ERROR Failed to start daemon: {}", error);
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or(LifecycleError::NoStateDir)?,
        config
            .log_path
            .file_name()
            .ok_or(LifecycleError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
