// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! muxwatch engine: session registry, reconciliation, monitoring and the
//! command bridge

pub mod bridge;
pub mod config;
mod engine;
mod error;
pub mod launch;
mod monitor;
pub mod reconcile;
mod record;
mod registry;
mod store;

#[cfg(test)]
mod test_helpers;

pub use bridge::{response_path, CommandBridge, RESPONSE_SUFFIX};
pub use config::EngineConfig;
pub use engine::{Engine, EngineDeps};
pub use error::{EngineError, RegistryError, StoreError};
pub use monitor::MonitorSignal;
pub use reconcile::{ReconcileIntent, ReconcileReport};
pub use record::{AgentSessionRecord, RecordOrigin, SessionSummary};
pub use registry::{SessionRegistry, NOTICE_TITLE};
pub use store::SessionStateStore;
