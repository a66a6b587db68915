// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mw-core: domain types for the muxwatch session mirror
//!
//! Everything in this crate is pure: identifier validation, identity
//! resolution, state-file decoding, snapshot diffing and rendering.

pub mod agent;
pub mod clock;
pub mod command;
pub mod diff;
pub mod id;
pub mod identity;
pub mod lifecycle;
pub mod session;
pub mod snapshot;
pub mod trigger;
pub mod view;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use agent::{AgentKind, ModelTier, UnknownName};
pub use clock::{Clock, FakeClock, SystemClock};
pub use command::{BridgeCommand, CommandParseError};
pub use diff::{diff_snapshots, ChangeKind, SessionChange};
pub use id::{TerminalId, TerminalIdGen};
pub use identity::{
    display_name, next_phonetic_token, resolve, Identity, ResolvedIdentity, MAX_DISPLAY_NAME_LEN,
    PHONETIC_ALPHABET,
};
pub use lifecycle::{HealthState, LifecycleState, StatusEmphasis};
pub use session::{InvalidSessionId, SessionId};
pub use snapshot::{HealthInfo, PayloadDetail, SessionPayload, SnapshotError, StateSnapshot};
pub use trigger::{StopSignal, TriggerSignal};
pub use view::{SessionView, ViewSource};
