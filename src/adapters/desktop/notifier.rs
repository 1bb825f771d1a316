//! Desktop notifications via notify-rust.

use crate::adapters::http::AssetCache;
use crate::domain::{DomainError, Notification};
use crate::ports::Notifier;
use tracing::warn;

pub struct DesktopNotifier {
    app_name: String,
    /// Local copy of a remote icon; `None` passes the icon through unchanged.
    icon_cache: Option<AssetCache>,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            icon_cache: None,
        }
    }

    /// Download URL icons once and hand the daemon a file path instead.
    pub fn with_icon_cache(mut self, cache: AssetCache) -> Self {
        self.icon_cache = Some(cache);
        self
    }

    async fn resolve_icon(&self, icon: &str) -> Option<String> {
        if !is_url(icon) {
            return Some(icon.to_string());
        }
        let cache = self.icon_cache.as_ref()?;
        match cache.local_path().await {
            Ok(path) => Some(path.display().to_string()),
            Err(e) => {
                warn!(icon, error = %e, "icon unavailable; showing notification without it");
                None
            }
        }
    }
}

fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

#[async_trait::async_trait]
impl Notifier for DesktopNotifier {
    async fn show(&self, notification: &Notification) -> Result<(), DomainError> {
        let icon = self.resolve_icon(&notification.icon).await;
        let app_name = self.app_name.clone();
        let title = notification.title.clone();
        let body = notification.body.clone();

        tokio::task::spawn_blocking(move || {
            let mut n = notify_rust::Notification::new();
            n.appname(&app_name).summary(&title).body(&body);
            if let Some(icon) = &icon {
                n.icon(icon);
            }
            n.show().map(|_| ()).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| DomainError::Notify(format!("notification task: {}", e)))?
        .map_err(DomainError::Notify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_icon_passes_through() {
        let notifier = DesktopNotifier::new("med-reminder");
        assert_eq!(
            notifier.resolve_icon("dialog-information").await.as_deref(),
            Some("dialog-information")
        );
    }

    #[tokio::test]
    async fn test_url_icon_without_cache_is_dropped() {
        let notifier = DesktopNotifier::new("med-reminder");
        assert_eq!(
            notifier
                .resolve_icon("https://cdn-icons-png.flaticon.com/512/2966/2966485.png")
                .await,
            None
        );
    }
}
