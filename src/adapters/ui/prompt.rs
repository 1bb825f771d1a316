//! Implements PermissionProvider. Inquire-based permission prompt.
//!
//! Browser semantics: only a `default` permission prompts. `denied` and
//! `granted` are sticky until the permission file is edited or removed.

use crate::adapters::persistence::PermissionJson;
use crate::domain::{DomainError, PermissionState};
use crate::ports::PermissionProvider;
use async_trait::async_trait;
use inquire::Confirm;
use std::sync::Arc;

type AskFn = dyn Fn() -> Result<bool, String> + Send + Sync;

pub struct PromptPermission {
    store: Arc<PermissionJson>,
    ask: Arc<AskFn>,
}

impl PromptPermission {
    /// Prompt on the terminal.
    pub fn new(store: Arc<PermissionJson>) -> Self {
        Self::with_prompt(store, ask_on_terminal)
    }

    /// Use a custom yes/no source instead of the terminal.
    pub fn with_prompt(
        store: Arc<PermissionJson>,
        ask: impl Fn() -> Result<bool, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            store,
            ask: Arc::new(ask),
        }
    }
}

fn ask_on_terminal() -> Result<bool, String> {
    Confirm::new("Allow medicine reminder notifications?")
        .with_default(true)
        .with_help_message("Reminders play an alarm sound too")
        .prompt()
        .map_err(|e| e.to_string())
}

#[async_trait]
impl PermissionProvider for PromptPermission {
    async fn state(&self) -> PermissionState {
        self.store.get().await
    }

    async fn request(&self) -> Result<PermissionState, DomainError> {
        let current = self.store.get().await;
        if current != PermissionState::Default {
            return Ok(current);
        }

        let ask = Arc::clone(&self.ask);
        let allowed = tokio::task::spawn_blocking(move || ask())
            .await
            .map_err(|e| DomainError::Permission(format!("prompt task: {}", e)))?
            .map_err(DomainError::Permission)?;

        let next = if allowed {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        };
        self.store.set(next).await?;
        Ok(next)
    }
}
