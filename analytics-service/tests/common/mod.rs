#![allow(dead_code)]

use analytics_service::config::AnalyticsConfig;
use analytics_service::Application;
use serde_json::Value;
use service_core::config::{Config, StoreConfig};
use service_core::store::Store;
use std::time::Duration;

pub struct TestApp {
    pub address: String,
    pub store: Store,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = AnalyticsConfig {
            common: Config::default(),
            port: 0,
            store: StoreConfig::memory(),
        };
        let store = Store::memory();

        let app = Application::build_with_store(config, store.clone())
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

        Self {
            address,
            store,
            client,
        }
    }

    pub async fn seed(&self, table: &str, row: Value) -> Value {
        self.store
            .insert::<_, Value>(table, &row)
            .await
            .expect("Failed to seed row")
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request");
        let status = response.status().as_u16();
        (status, response.json().await.expect("Failed to parse JSON"))
    }
}
