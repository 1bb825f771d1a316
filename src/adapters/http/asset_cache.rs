//! Download-once cache for remote assets (alarm clip, notification icon).

use crate::adapters::http::HttpReminderClient;
use crate::adapters::persistence::write_atomic;
use crate::domain::DomainError;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::OnceCell;
use tracing::info;

pub struct AssetCache {
    client: Arc<HttpReminderClient>,
    /// Server-relative path or absolute URL.
    source: String,
    dest: PathBuf,
    ready: OnceCell<PathBuf>,
}

impl AssetCache {
    pub fn new(
        client: Arc<HttpReminderClient>,
        source: impl Into<String>,
        dest: impl AsRef<Path>,
    ) -> Self {
        Self {
            client,
            source: source.into(),
            dest: dest.as_ref().to_path_buf(),
            ready: OnceCell::new(),
        }
    }

    /// Local path of the asset, downloading it on first use. A failed
    /// download is retried on the next call.
    pub async fn local_path(&self) -> Result<PathBuf, DomainError> {
        self.ready
            .get_or_try_init(|| async {
                if fs::try_exists(&self.dest).await.unwrap_or(false) {
                    return Ok(self.dest.clone());
                }
                let bytes = self.client.fetch_asset(&self.source).await?;
                write_atomic(&self.dest, &bytes).await.map_err(|e| {
                    DomainError::Fetch(format!("cache {}: {}", self.dest.display(), e))
                })?;
                info!(source = %self.source, path = %self.dest.display(), "asset cached");
                Ok::<_, DomainError>(self.dest.clone())
            })
            .await
            .cloned()
    }
}

/// Cache file name for `source`, e.g. `icon-3f2a9c0d1e4b5a67.png`.
///
/// The name changes with the source, so a reconfigured icon or clip is
/// downloaded again instead of reusing the file cached for the old one.
pub fn cache_file_name(prefix: &str, source: &str) -> String {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    let digest = hasher.finish();

    let last_segment = source
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('/')
        .next()
        .unwrap_or_default();
    match Path::new(last_segment).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{}-{:016x}.{}", prefix, digest, ext),
        _ => format!("{}-{:016x}", prefix, digest),
    }
}
