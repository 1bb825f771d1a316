//! Login flow. The reminder endpoint only reports medicines of the logged-in
//! user, so the session has to exist before the first poll.

use crate::domain::DomainError;
use crate::ports::SessionPort;
use std::sync::Arc;
use tracing::info;

pub struct SessionService {
    session: Arc<dyn SessionPort>,
    credentials: Option<(String, String)>,
}

impl SessionService {
    pub fn new(session: Arc<dyn SessionPort>, credentials: Option<(String, String)>) -> Self {
        Self {
            session,
            credentials,
        }
    }

    /// Log in when credentials are configured; otherwise poll anonymously.
    pub async fn ensure_session(&self) -> Result<(), DomainError> {
        let Some((email, password)) = &self.credentials else {
            info!("no credentials configured; polling without a session");
            return Ok(());
        };
        self.session.login(email, password).await?;
        info!(email = %email, "logged in to reminder server");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSession {
        logins: Mutex<Vec<(String, String)>>,
        reject: bool,
    }

    #[async_trait::async_trait]
    impl SessionPort for FakeSession {
        async fn login(&self, email: &str, password: &str) -> Result<(), DomainError> {
            self.logins
                .lock()
                .unwrap()
                .push((email.to_string(), password.to_string()));
            if self.reject {
                return Err(DomainError::Session("Invalid email or password".into()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_without_credentials_skips_login() {
        let session = Arc::new(FakeSession::default());
        let service = SessionService::new(session.clone(), None);

        service.ensure_session().await.unwrap();

        assert!(session.logins.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logs_in_with_credentials() {
        let session = Arc::new(FakeSession::default());
        let service = SessionService::new(
            session.clone(),
            Some(("pat@example.com".into(), "hunter2".into())),
        );

        service.ensure_session().await.unwrap();

        assert_eq!(
            *session.logins.lock().unwrap(),
            vec![("pat@example.com".to_string(), "hunter2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_login_failure_propagates() {
        let session = Arc::new(FakeSession {
            reject: true,
            ..Default::default()
        });
        let service = SessionService::new(session, Some(("a@b.c".into(), "x".into())));

        assert!(matches!(
            service.ensure_session().await,
            Err(DomainError::Session(_))
        ));
    }
}
