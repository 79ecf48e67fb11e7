#![allow(dead_code)]

use async_trait::async_trait;
use notification_service::config::{EmailConfig, NotificationConfig};
use notification_service::services::providers::{ProviderError, ProviderResponse};
use notification_service::services::{EmailMessage, EmailProvider};
use notification_service::Application;
use service_core::config::Config;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Captures messages instead of delivering them, or fails every send.
#[derive(Default)]
pub struct RecordingProvider {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail: bool,
}

impl RecordingProvider {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailProvider for RecordingProvider {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, email: &EmailMessage) -> Result<ProviderResponse, ProviderError> {
        if self.fail {
            return Err(ProviderError::SendFailed(
                "resend send failed with status: 500".to_string(),
            ));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(ProviderResponse::accepted(Some("test-1".to_string())))
    }
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

pub fn test_config(email: EmailConfig) -> NotificationConfig {
    NotificationConfig {
        common: Config::default(),
        port: 0,
        email,
    }
}

impl TestApp {
    /// Spawn with providers chosen from `email`, as in production.
    pub async fn spawn(email: EmailConfig) -> Self {
        let app = Application::build(test_config(email))
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    pub async fn spawn_with_provider(provider: Arc<dyn EmailProvider>) -> Self {
        let app = Application::build_with_provider(test_config(EmailConfig::default()), provider)
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    async fn start(app: Application) -> Self {
        let address = format!("http://127.0.0.1:{}", app.http_port());
        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client
                .get(format!("{}/health", address))
                .send()
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        Self { address, client }
    }

    pub async fn post(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
