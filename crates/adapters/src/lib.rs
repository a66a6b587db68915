// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the multiplexer, presentation sinks,
//! notifications, and the state-file watcher.

pub mod env;
pub mod notify;
pub mod presentation;
pub mod session;
pub mod subprocess;
pub mod traced;
pub mod watcher;

pub use notify::{
    DesktopNotifyAdapter, NoOpNotifyAdapter, Notice, NoticeLevel, NotifyAdapter, NotifyError,
};
pub use presentation::{
    NoOpPresentationAdapter, PresentationAdapter, PresentationError, TerminalHandle,
    TmuxPresentation,
};
pub use session::{NoOpSessionAdapter, SessionAdapter, SessionError, TmuxAdapter};
pub use traced::TracedSession;
pub use watcher::{StateFileWatcher, WatchEvent, WatcherConfig};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifyAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use presentation::{FakePresentationAdapter, PresentationCall};
#[cfg(any(test, feature = "test-support"))]
pub use session::{FakeSession, FakeSessionAdapter, SessionCall};
