//! Application configuration. Server location, polling cadence, desktop integration.

use crate::domain::{DEFAULT_ICON, DomainError};
use serde::Deserialize;
use std::time::Duration;

/// Seconds between two reminder polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
/// Upper bound for the poll interval (one week).
pub const MAX_POLL_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REMINDER_PATH: &str = "/check_reminder";
pub const DEFAULT_ALARM_PATH: &str = "/static/alarm.mp3";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Base URL of the reminder server. Read from MED_REMINDER_SERVER_URL.
    #[serde(default)]
    pub server_url: Option<String>,

    /// Path of the due-reminder endpoint. Read from MED_REMINDER_REMINDER_PATH.
    #[serde(default)]
    pub reminder_path: Option<String>,

    /// Path of the alarm clip, relative to the server origin. Read from MED_REMINDER_ALARM_PATH.
    #[serde(default)]
    pub alarm_path: Option<String>,

    /// Local alarm clip; when set, the server clip is not downloaded. Read from MED_REMINDER_ALARM_FILE.
    #[serde(default)]
    pub alarm_file: Option<String>,

    /// Poll period in seconds (default 30). Read from MED_REMINDER_POLL_INTERVAL_SECS.
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,

    /// Per-request HTTP timeout in seconds (default 10). Read from MED_REMINDER_REQUEST_TIMEOUT_SECS.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Notification icon (URL, path or icon name). Read from MED_REMINDER_ICON.
    #[serde(default)]
    pub icon: Option<String>,

    /// Directory for the permission file and cached alarm clip. Read from MED_REMINDER_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Audio player command line; the clip path is appended. Read from MED_REMINDER_PLAYER_COMMAND.
    #[serde(default)]
    pub player_command: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────
    /// Account email. Read from MED_REMINDER_EMAIL.
    #[serde(default)]
    pub email: Option<String>,

    /// Account password. Read from MED_REMINDER_PASSWORD.
    #[serde(default)]
    pub password: Option<String>,

    /// Mark each triggered reminder as taken on the server. Read from MED_REMINDER_ACKNOWLEDGE.
    #[serde(default)]
    pub acknowledge: Option<bool>,

    /// Log notifications and sounds instead of using the desktop. Read from MED_REMINDER_DRY_RUN.
    #[serde(default)]
    pub dry_run: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("MED_REMINDER").try_parsing(true));
        if let Ok(path) = std::env::var("MED_REMINDER_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Reject values that would make the poller meaningless.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.poll_interval_secs == Some(0) {
            return Err(DomainError::Config(
                "poll_interval_secs must be greater than zero".into(),
            ));
        }
        if let Some(secs) = self.poll_interval_secs.filter(|s| *s > MAX_POLL_INTERVAL_SECS) {
            return Err(DomainError::Config(format!(
                "poll_interval_secs must be at most {} (got {})",
                MAX_POLL_INTERVAL_SECS, secs
            )));
        }
        if self.email.is_some() != self.password.is_some() {
            return Err(DomainError::Config(
                "email and password must be set together".into(),
            ));
        }
        Ok(())
    }

    /// Returns the server base URL without a trailing slash.
    pub fn server_url_or_default(&self) -> String {
        self.server_url
            .as_deref()
            .unwrap_or(DEFAULT_SERVER_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn reminder_path_or_default(&self) -> String {
        self.reminder_path
            .clone()
            .unwrap_or_else(|| DEFAULT_REMINDER_PATH.to_string())
    }

    pub fn alarm_path_or_default(&self) -> String {
        self.alarm_path
            .clone()
            .unwrap_or_else(|| DEFAULT_ALARM_PATH.to_string())
    }

    /// Returns the poll period. Defaults to 30 seconds.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(
            self.poll_interval_secs
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        )
    }

    /// Returns the HTTP request timeout. Defaults to 10 seconds.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(10))
    }

    pub fn icon_or_default(&self) -> String {
        self.icon.clone().unwrap_or_else(|| DEFAULT_ICON.to_string())
    }

    pub fn data_dir_or_default(&self) -> String {
        self.data_dir.clone().unwrap_or_else(|| "./data".to_string())
    }

    /// Returns the player command, falling back to the platform's stock player.
    pub fn player_command_or_default(&self) -> String {
        self.player_command
            .clone()
            .unwrap_or_else(|| default_player_command().to_string())
    }

    /// Returns (email, password) when both are configured.
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.email, &self.password) {
            (Some(e), Some(p)) => Some((e.clone(), p.clone())),
            _ => None,
        }
    }

    pub fn acknowledge_or_default(&self) -> bool {
        self.acknowledge.unwrap_or(false)
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run.unwrap_or(false)
    }
}

fn default_player_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "afplay"
    } else {
        "paplay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server_url_or_default(), "http://127.0.0.1:5000");
        assert_eq!(cfg.reminder_path_or_default(), "/check_reminder");
        assert_eq!(cfg.alarm_path_or_default(), "/static/alarm.mp3");
        assert_eq!(cfg.poll_interval(), Duration::from_secs(30));
        assert_eq!(cfg.icon_or_default(), DEFAULT_ICON);
        assert!(!cfg.acknowledge_or_default());
        assert!(cfg.credentials().is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_server_url_trailing_slash_trimmed() {
        let cfg = AppConfig {
            server_url: Some("https://meds.example.com/".into()),
            ..Default::default()
        };
        assert_eq!(cfg.server_url_or_default(), "https://meds.example.com");
    }

    #[test]
    fn test_zero_interval_rejected() {
        let cfg = AppConfig {
            poll_interval_secs: Some(0),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(DomainError::Config(_))));
    }

    #[test]
    fn test_huge_interval_rejected() {
        let cfg = AppConfig {
            poll_interval_secs: Some(u64::MAX),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(DomainError::Config(_))));

        let cfg = AppConfig {
            poll_interval_secs: Some(MAX_POLL_INTERVAL_SECS),
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_half_credentials_rejected() {
        let cfg = AppConfig {
            email: Some("a@b.c".into()),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
