//! Permission-gated notification + alarm sound for a single reminder.

use crate::domain::{Notification, PermissionState};
use crate::ports::{Notifier, PermissionProvider, SoundPlayer};
use std::sync::Arc;
use tracing::{debug, warn};

/// What happened to a trigger request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Permission granted; notification and sound were attempted.
    Shown,
    /// Permission not granted; nothing was attempted.
    Suppressed(PermissionState),
}

pub struct NotificationTrigger {
    permission: Arc<dyn PermissionProvider>,
    notifier: Arc<dyn Notifier>,
    sound: Arc<dyn SoundPlayer>,
    icon: String,
}

impl NotificationTrigger {
    pub fn new(
        permission: Arc<dyn PermissionProvider>,
        notifier: Arc<dyn Notifier>,
        sound: Arc<dyn SoundPlayer>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            permission,
            notifier,
            sound,
            icon: icon.into(),
        }
    }

    /// Show the medicine notification and start the alarm, if permitted.
    ///
    /// The sound is gated by the same permission check as the notification.
    /// Display and playback failures are logged and swallowed.
    pub async fn trigger(&self, name: &str, dosage: &str) -> TriggerOutcome {
        let state = self.permission.state().await;
        if !state.is_granted() {
            debug!(%state, name, "notification suppressed: permission not granted");
            return TriggerOutcome::Suppressed(state);
        }

        let notification = Notification::for_medicine(name, dosage, &self.icon);
        let (shown, played) = tokio::join!(self.notifier.show(&notification), self.sound.play());
        if let Err(e) = shown {
            warn!(name, error = %e, "failed to display notification");
        }
        if let Err(e) = played {
            warn!(name, error = %e, "failed to play alarm");
        }
        TriggerOutcome::Shown
    }
}
