//! # Notification Emitter
//!
//! Transient toast messages with a timed lifecycle.
//!
//! ```text
//!   t = 0            insert (Entering)
//!   t = fade_in      Visible
//!   t = visible      Leaving
//!   t = visible
//!     + fade_out     removed
//! ```
//!
//! Each notification runs its own timer task. Several can be on screen at
//! once; there is no dedup and no queue.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::NotificationConfig;
use crate::surface::PageSurface;

/// Visual kind of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        }
    }
}

/// Lifecycle phase of an inserted notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPhase {
    Entering,
    Visible,
    Leaving,
}

/// Identifier of an inserted notification; increases monotonically.
pub type NotificationId = u64;

/// Durations of the notification lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTiming {
    pub fade_in_delay: Duration,
    pub visible: Duration,
    pub fade_out: Duration,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        NotificationTiming::from(&NotificationConfig::default())
    }
}

impl From<&NotificationConfig> for NotificationTiming {
    fn from(config: &NotificationConfig) -> Self {
        NotificationTiming {
            fade_in_delay: Duration::from_millis(config.fade_in_delay_ms),
            visible: Duration::from_millis(config.visible_ms),
            fade_out: Duration::from_millis(config.fade_out_ms),
        }
    }
}

/// Inserts notifications into the page and retires them on a timer.
pub struct Notifier {
    surface: Arc<dyn PageSurface>,
    timing: NotificationTiming,
    next_id: AtomicU64,
}

impl Notifier {
    pub fn new(surface: Arc<dyn PageSurface>, timing: NotificationTiming) -> Self {
        Notifier {
            surface,
            timing,
            next_id: AtomicU64::new(1),
        }
    }

    /// Shows a message and schedules its removal.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn notify(&self, message: &str, kind: NotificationKind) -> NotificationId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(id, kind = kind.as_str(), message, "showing notification");
        self.surface.insert_notification(id, message, kind);

        let surface = self.surface.clone();
        let timing = self.timing;
        tokio::spawn(async move {
            tokio::time::sleep(timing.fade_in_delay).await;
            surface.set_notification_phase(id, NotificationPhase::Visible);

            tokio::time::sleep(timing.visible.saturating_sub(timing.fade_in_delay)).await;
            surface.set_notification_phase(id, NotificationPhase::Leaving);

            tokio::time::sleep(timing.fade_out).await;
            surface.remove_notification(id);
        });

        id
    }
}
