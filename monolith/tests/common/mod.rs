#![allow(dead_code)]

use invoice_service::config::PdfBranding;
use monolith::config::MonolithConfig;
use monolith::Application;
use notification_service::config::EmailConfig;
use notification_service::services::providers::ConsoleProvider;
use service_core::config::{Config, StoreConfig};
use service_core::store::Store;
use std::sync::Arc;
use std::time::Duration;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(store: Option<Store>) -> Self {
        let config = MonolithConfig {
            common: Config::default(),
            port: 0,
            store: store.as_ref().map(|_| StoreConfig::memory()),
            branding: PdfBranding::default(),
            email: EmailConfig::default(),
            cors_origins: Vec::new(),
        };

        let app = Application::build_with(config, store, Arc::new(ConsoleProvider))
            .await
            .expect("Failed to build test application");
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

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}
