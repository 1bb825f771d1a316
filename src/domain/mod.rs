//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{
    DEFAULT_ICON, MedicineReminder, NOTIFICATION_TITLE, Notification, PermissionState,
    reminder_body,
};
pub use errors::DomainError;
