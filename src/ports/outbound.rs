//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters. The capability ports (`PermissionProvider`,
//! `Notifier`, `SoundPlayer`) stand in for the platform APIs so the poller
//! runs without a real desktop.

use crate::domain::{DomainError, MedicineReminder, Notification, PermissionState};

/// Reminder server gateway.
#[async_trait::async_trait]
pub trait ReminderSource: Send + Sync {
    /// Fetch the reminders due right now, in server order.
    async fn fetch_due(&self) -> Result<Vec<MedicineReminder>, DomainError>;

    /// Tell the server a medicine was taken so it stops being reported as due.
    async fn mark_taken(&self, medicine_id: i64) -> Result<(), DomainError>;
}

/// Owner of the notification permission flag.
#[async_trait::async_trait]
pub trait PermissionProvider: Send + Sync {
    /// Current permission state. Cheap; called before every notification.
    async fn state(&self) -> PermissionState;

    /// Ask the user for permission. Only prompts from `Default`; otherwise
    /// returns the current state unchanged.
    async fn request(&self) -> Result<PermissionState, DomainError>;
}

/// Displays notifications.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn show(&self, notification: &Notification) -> Result<(), DomainError>;
}

/// Starts audio playback. Returns once playback has started, not finished.
#[async_trait::async_trait]
pub trait SoundPlayer: Send + Sync {
    async fn play(&self) -> Result<(), DomainError>;
}

/// Server session (login).
#[async_trait::async_trait]
pub trait SessionPort: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<(), DomainError>;
}
