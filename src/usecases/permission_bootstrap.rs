//! One-shot permission request at startup.

use crate::domain::PermissionState;
use crate::ports::PermissionProvider;
use std::sync::Arc;
use tracing::{info, warn};

pub struct PermissionBootstrap {
    permission: Arc<dyn PermissionProvider>,
}

impl PermissionBootstrap {
    pub fn new(permission: Arc<dyn PermissionProvider>) -> Self {
        Self { permission }
    }

    /// Request permission unless already granted. The answer is only logged;
    /// every later notification re-checks the state itself.
    pub async fn run(&self) -> PermissionState {
        let current = self.permission.state().await;
        if current.is_granted() {
            return current;
        }
        match self.permission.request().await {
            Ok(state) => {
                info!(from = %current, to = %state, "notification permission requested");
                state
            }
            Err(e) => {
                warn!(error = %e, "notification permission request failed");
                current
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::StaticPermission;

    #[tokio::test]
    async fn test_granted_does_not_request() {
        let permission = Arc::new(StaticPermission::new(PermissionState::Granted));
        let state = PermissionBootstrap::new(permission.clone()).run().await;
        assert_eq!(state, PermissionState::Granted);
        assert_eq!(permission.request_count(), 0);
    }

    #[tokio::test]
    async fn test_default_requests_once() {
        let permission = Arc::new(StaticPermission::with_answer(
            PermissionState::Default,
            PermissionState::Granted,
        ));
        let state = PermissionBootstrap::new(permission.clone()).run().await;
        assert_eq!(state, PermissionState::Granted);
        assert_eq!(permission.request_count(), 1);
    }

    #[tokio::test]
    async fn test_denied_still_requests() {
        let permission = Arc::new(StaticPermission::new(PermissionState::Denied));
        let state = PermissionBootstrap::new(permission.clone()).run().await;
        assert_eq!(state, PermissionState::Denied);
        assert_eq!(permission.request_count(), 1);
    }
}
