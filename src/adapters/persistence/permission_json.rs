//! Notification permission stored in a JSON file.
//!
//! Plays the part of the browser-owned permission flag: it outlives the
//! process, and only the user's answer to a prompt changes it.

use crate::adapters::persistence::write_atomic;
use crate::domain::{DomainError, PermissionState};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
struct PermissionData {
    notifications: PermissionState,
}

pub struct PermissionJson {
    path: std::path::PathBuf,
    cache: tokio::sync::RwLock<PermissionData>,
}

impl PermissionJson {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: tokio::sync::RwLock::new(PermissionData::default()),
        }
    }

    /// Load from disk. Missing or unreadable file means `Default`.
    pub async fn load(&self) -> Result<(), DomainError> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
            Err(_) => PermissionData::default(),
        };
        *self.cache.write().await = data;
        Ok(())
    }

    pub async fn get(&self) -> PermissionState {
        self.cache.read().await.notifications
    }

    pub async fn set(&self, state: PermissionState) -> Result<(), DomainError> {
        self.cache.write().await.notifications = state;
        self.save().await
    }

    async fn save(&self) -> Result<(), DomainError> {
        let data = self.cache.read().await;
        let json = serde_json::to_string_pretty(&*data)
            .map_err(|e| DomainError::Permission(e.to_string()))?;
        write_atomic(&self.path, json.as_bytes())
            .await
            .map_err(|e| DomainError::Permission(format!("save {}: {}", self.path.display(), e)))
    }
}
