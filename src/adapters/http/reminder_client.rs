//! HTTP adapter for the reminder server. Implements ReminderSource and SessionPort.
//!
//! One reqwest client with a cookie store, so the session cookie set by
//! `/login` rides along on every later request.

use crate::domain::{DomainError, MedicineReminder};
use crate::ports::{ReminderSource, SessionPort};
use reqwest::{Client, StatusCode, redirect};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SuccessResponse {
    success: bool,
}

pub struct HttpReminderClient {
    client: Client,
    base_url: String,
    reminder_path: String,
}

impl HttpReminderClient {
    /// # Arguments
    /// * `base_url` - Server origin, e.g. "http://127.0.0.1:5000" (no trailing slash)
    /// * `reminder_path` - Due-reminder endpoint, e.g. "/check_reminder"
    /// * `timeout` - Per-request timeout
    pub fn new(
        base_url: impl Into<String>,
        reminder_path: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        // Redirects stay visible: the login form answers with one.
        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            reminder_path: reminder_path.into(),
        })
    }

    /// Resolve `path` against the server origin. Absolute URLs pass through.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Download a static asset (server-relative path or absolute URL).
    pub async fn fetch_asset(&self, path: &str) -> Result<Vec<u8>, DomainError> {
        let url = self.url(path);
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::Fetch(format!("asset request failed: {}", e)))?;
        if !res.status().is_success() {
            return Err(DomainError::Fetch(format!(
                "asset {} returned {}",
                url,
                res.status()
            )));
        }
        let bytes = res
            .bytes()
            .await
            .map_err(|e| DomainError::Fetch(format!("asset body: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl ReminderSource for HttpReminderClient {
    async fn fetch_due(&self) -> Result<Vec<MedicineReminder>, DomainError> {
        let url = self.url(&self.reminder_path);
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::Fetch(format!("Request failed: {}", e)))?;

        let status = res.status();
        if !status.is_success() {
            return Err(DomainError::Fetch(format!("{} returned {}", url, status)));
        }

        let body = res
            .text()
            .await
            .map_err(|e| DomainError::Fetch(format!("Read body failed: {}", e)))?;
        debug!(len = body.len(), "reminder response received");
        serde_json::from_str(&body).map_err(|e| DomainError::Decode(e.to_string()))
    }

    async fn mark_taken(&self, medicine_id: i64) -> Result<(), DomainError> {
        let url = self.url(&format!("/mark_taken/{}", medicine_id));
        let res = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| DomainError::Fetch(format!("Request failed: {}", e)))?;

        let status = res.status();
        let ack = res.json::<SuccessResponse>().await.ok();
        match ack {
            Some(SuccessResponse { success: true }) if status.is_success() => Ok(()),
            _ => Err(DomainError::Fetch(format!(
                "mark_taken({}) rejected with {}",
                medicine_id, status
            ))),
        }
    }
}

#[async_trait::async_trait]
impl SessionPort for HttpReminderClient {
    async fn login(&self, email: &str, password: &str) -> Result<(), DomainError> {
        let url = self.url("/login");
        let res = self
            .client
            .post(&url)
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .map_err(|e| DomainError::Session(format!("Request failed: {}", e)))?;

        // Success redirects away from the form; failure redirects back to it.
        let status = res.status();
        let location = res
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let target = location.trim_end_matches('/');
        match status {
            s if s.is_redirection() && target.ends_with("/login") => {
                Err(DomainError::Session("Invalid email or password".into()))
            }
            // Admins land on their dashboard and have no reminders to poll.
            s if s.is_redirection() && target.ends_with("/admin_dashboard") => {
                Err(DomainError::Session(format!(
                    "{} is an admin account; admins have no medicine reminders, log in as a patient",
                    email
                )))
            }
            s if s.is_redirection() => Ok(()),
            s if s == StatusCode::OK => Err(DomainError::Session(
                "login form returned without redirect".into(),
            )),
            s => Err(DomainError::Session(format!("login returned {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> HttpReminderClient {
        HttpReminderClient::new(server.url(), "/check_reminder", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_due_parses_array_in_order() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/check_reminder")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id":1,"name":"Aspirin","dosage":"100mg"},{"id":2,"name":"Zinc","dosage":null}]"#,
            )
            .create_async()
            .await;

        let meds = client_for(&server).fetch_due().await.unwrap();

        assert_eq!(
            meds,
            vec![
                MedicineReminder::new("Aspirin", "100mg").with_id(1),
                MedicineReminder::without_dosage("Zinc").with_id(2),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_due_empty() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/check_reminder")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        assert!(client_for(&server).fetch_due().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_due_non_json_is_decode_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/check_reminder")
            .with_status(200)
            .with_body("<html>login</html>")
            .create_async()
            .await;

        assert!(matches!(
            client_for(&server).fetch_due().await,
            Err(DomainError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_due_server_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/check_reminder")
            .with_status(500)
            .create_async()
            .await;

        assert!(matches!(
            client_for(&server).fetch_due().await,
            Err(DomainError::Fetch(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_due_unreachable() {
        let client = HttpReminderClient::new(
            "http://127.0.0.1:1",
            "/check_reminder",
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(matches!(client.fetch_due().await, Err(DomainError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_login_success_sets_session_cookie() {
        let mut server = Server::new_async().await;
        let login = server
            .mock("POST", "/login")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("email".into(), "pat@example.com".into()),
                Matcher::UrlEncoded("password".into(), "hunter2".into()),
            ]))
            .with_status(302)
            .with_header("location", "/")
            .with_header("set-cookie", "session=abc123; Path=/")
            .create_async()
            .await;
        let check = server
            .mock("GET", "/check_reminder")
            .match_header("cookie", Matcher::Regex("session=abc123".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = client_for(&server);
        client.login("pat@example.com", "hunter2").await.unwrap();
        client.fetch_due().await.unwrap();

        login.assert_async().await;
        check.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/login")
            .with_status(302)
            .with_header("location", "/login")
            .create_async()
            .await;

        assert!(matches!(
            client_for(&server).login("a@b.c", "wrong").await,
            Err(DomainError::Session(_))
        ));
    }

    #[tokio::test]
    async fn test_login_as_admin_is_session_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/login")
            .with_status(302)
            .with_header("location", "/admin_dashboard")
            .with_header("set-cookie", "session=admin; Path=/")
            .create_async()
            .await;

        match client_for(&server).login("admin@example.com", "secret").await {
            Err(DomainError::Session(msg)) => assert!(msg.contains("admin account")),
            other => panic!("expected session error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mark_taken() {
        let mut server = Server::new_async().await;
        let ok = server
            .mock("POST", "/mark_taken/4")
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;
        let _missing = server
            .mock("POST", "/mark_taken/5")
            .with_status(404)
            .with_body(r#"{"success": false}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        client.mark_taken(4).await.unwrap();
        assert!(client.mark_taken(5).await.is_err());
        ok.assert_async().await;
    }

    #[test]
    fn test_url_resolution() {
        let client =
            HttpReminderClient::new("http://meds.local", "/check_reminder", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.url("/static/alarm.mp3"), "http://meds.local/static/alarm.mp3");
        assert_eq!(
            client.url("https://cdn.example.com/icon.png"),
            "https://cdn.example.com/icon.png"
        );
    }

    #[tokio::test]
    async fn test_fetch_asset() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/static/alarm.mp3")
            .with_status(200)
            .with_body(b"ID3fake".as_slice())
            .create_async()
            .await;

        let bytes = client_for(&server).fetch_asset("/static/alarm.mp3").await.unwrap();
        assert_eq!(bytes, b"ID3fake");
    }
}
