#![allow(dead_code)]

use customer_service::config::CustomerConfig;
use customer_service::Application;
use serde_json::{json, Value};
use service_core::config::{Config, StoreConfig};
use service_core::store::Store;
use std::time::Duration;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Store,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = CustomerConfig {
            common: Config::default(),
            port: 0,
            store: StoreConfig::memory(),
        };
        let store = Store::memory();

        let app = Application::build_with_store(config, store.clone())
            .await
            .expect("Failed to build test application");
        let port = app.http_port();
        let address = format!("http://127.0.0.1:{}", port);

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
            port,
            store,
            client,
        }
    }

    pub async fn create_customer(&self, name: &str, email: &str) -> Value {
        let response = self
            .client
            .post(format!("{}/customers", self.address))
            .json(&json!({ "name": name, "email": email, "city": "Jakarta" }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["data"].clone()
    }
}
