//! Reminder server adapter (reqwest).

pub mod asset_cache;
pub mod reminder_client;

pub use asset_cache::{AssetCache, cache_file_name};
pub use reminder_client::HttpReminderClient;
