//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Reminder fetch failed: {0}")]
    Fetch(String),

    #[error("Reminder payload could not be decoded: {0}")]
    Decode(String),

    #[error("Notification failed: {0}")]
    Notify(String),

    #[error("Sound playback failed: {0}")]
    Sound(String),

    #[error("Permission error: {0}")]
    Permission(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
