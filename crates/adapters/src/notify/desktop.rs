// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop notification adapter using notify-rust.
//!
//! On macOS, `notify-rust` goes through `mac-notification-sys`, whose first
//! notification looks up a bundle identifier via AppleScript. A daemon without
//! Automation permission blocks forever on that lookup, so the identifier is
//! set up front.

use super::{Notice, NotifyAdapter, NotifyError};
use async_trait::async_trait;

#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifyAdapter;

impl DesktopNotifyAdapter {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }
        Self
    }
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn notify(&self, notice: &Notice) -> Result<(), NotifyError> {
        let notice = notice.clone();
        // show() is synchronous; fire-and-forget on the blocking pool.
        tokio::task::spawn_blocking(move || {
            let mut notification = notify_rust::Notification::new();
            notification
                .appname("muxwatch")
                .summary(&notice.title)
                .body(&notice.body);
            #[cfg(all(unix, not(target_os = "macos")))]
            {
                notification.urgency(match notice.level {
                    super::NoticeLevel::Error => notify_rust::Urgency::Critical,
                    super::NoticeLevel::Warning | super::NoticeLevel::Info => {
                        notify_rust::Urgency::Normal
                    }
                });
            }
            match notification.show() {
                Ok(_) => tracing::debug!(title = %notice.title, "desktop notification sent"),
                Err(e) => {
                    tracing::warn!(title = %notice.title, error = %e, "desktop notification failed")
                }
            }
        });
        Ok(())
    }
}
