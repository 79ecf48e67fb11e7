#![allow(dead_code)]

use api_gateway::config::{GatewayConfig, ServiceRoute};
use api_gateway::Application;
use service_core::config::Config;
use std::time::Duration;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

pub fn route(prefix: &str, service: &str, base_url: &str) -> ServiceRoute {
    ServiceRoute {
        prefix: prefix.to_string(),
        service: service.to_string(),
        base_url: base_url.trim_end_matches('/').to_string(),
    }
}

impl TestApp {
    pub async fn spawn(routes: Vec<ServiceRoute>) -> Self {
        let config = GatewayConfig {
            common: Config::default(),
            port: 0,
            routes,
            cors_origins: vec!["http://localhost:3000".to_string()],
        };

        let app = Application::build(config)
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
}
