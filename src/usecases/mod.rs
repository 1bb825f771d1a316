//! Application use cases. Orchestrate domain logic via ports.

pub mod notification_trigger;
pub mod permission_bootstrap;
pub mod reminder_poller;
pub mod session_service;

pub use notification_trigger::{NotificationTrigger, TriggerOutcome};
pub use permission_bootstrap::PermissionBootstrap;
pub use reminder_poller::{PollerHandle, ReminderPoller};
pub use session_service::SessionService;
