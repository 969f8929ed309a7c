//! Transient notifications.
//!
//! One notification at a time: showing a new one replaces the current one
//! and cancels its pending dismissal.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::view::{NotificationKind, TaskView};

pub struct Notifier {
    view: Arc<dyn TaskView>,
    duration: Duration,
    current: Mutex<Option<CancellationToken>>,
}

impl Notifier {
    pub fn new(view: Arc<dyn TaskView>, duration: Duration) -> Self {
        Self {
            view,
            duration,
            current: Mutex::new(None),
        }
    }

    /// Show `message` and schedule its dismissal.
    pub fn show(&self, message: &str, kind: NotificationKind) {
        let token = CancellationToken::new();
        if let Some(previous) = self.current.lock().replace(token.clone()) {
            previous.cancel();
        }

        self.view.show_notification(message, kind);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No runtime for notification dismissal; leaving it visible");
            return;
        };

        let view = self.view.clone();
        let duration = self.duration;
        runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(duration) => view.hide_notification(),
            }
        });
    }
}
