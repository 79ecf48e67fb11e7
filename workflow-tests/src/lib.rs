//! Cross-service workflow integration tests library.
//!
//! [`WorkflowStack::spawn`] starts every service in-process on an ephemeral
//! port, all sharing one in-memory table store, and puts the API gateway in
//! front of them. Tests then talk to the gateway only, exactly as a client
//! would.

use anyhow::{anyhow, Result};
use api_gateway::config::{GatewayConfig, ServiceRoute, SERVICES};
use notification_service::config::{EmailConfig, NotificationConfig};
use serde_json::Value;
use service_core::config::{Config, StoreConfig};
use service_core::store::Store;
use std::future::Future;
use std::sync::Once;
use std::time::Duration;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,workflow_tests=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// One running backend: its gateway env prefix and base URL.
#[derive(Debug, Clone)]
pub struct ServiceEndpoint {
    pub name: &'static str,
    pub url: String,
}

impl ServiceEndpoint {
    pub fn health_url(&self) -> String {
        format!("{}/health", self.url)
    }
}

/// Gateway plus the five services over one shared store.
pub struct WorkflowStack {
    pub gateway_url: String,
    pub services: Vec<ServiceEndpoint>,
    pub store: Store,
    pub client: reqwest::Client,
}

fn spawn_server<F>(name: &'static str, port: u16, server: F) -> ServiceEndpoint
where
    F: Future<Output = std::io::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = server.await {
            tracing::error!(service = name, error = %e, "Service stopped");
        }
    });
    ServiceEndpoint {
        name,
        url: format!("http://127.0.0.1:{}", port),
    }
}

fn common() -> Config {
    Config::default()
}

impl WorkflowStack {
    pub async fn spawn() -> Result<Self> {
        init_tracing();

        let store = Store::memory();
        let mut services = Vec::new();

        let customer = customer_service::Application::build_with_store(
            customer_service::config::CustomerConfig {
                common: common(),
                port: 0,
                store: StoreConfig::memory(),
            },
            store.clone(),
        )
        .await
        .map_err(|e| anyhow!("Failed to build customer-service: {}", e))?;
        services.push(spawn_server(
            "CUSTOMER_SERVICE",
            customer.http_port(),
            customer.run_until_stopped(),
        ));

        let invoice = invoice_service::Application::build_with_store(
            invoice_service::config::InvoiceConfig {
                common: common(),
                port: 0,
                store: StoreConfig::memory(),
                branding: Default::default(),
            },
            store.clone(),
        )
        .await
        .map_err(|e| anyhow!("Failed to build invoice-service: {}", e))?;
        services.push(spawn_server(
            "INVOICE_SERVICE",
            invoice.http_port(),
            invoice.run_until_stopped(),
        ));

        let payment = payment_service::Application::build_with_store(
            payment_service::config::PaymentConfig {
                common: common(),
                port: 0,
                store: StoreConfig::memory(),
            },
            store.clone(),
        )
        .await
        .map_err(|e| anyhow!("Failed to build payment-service: {}", e))?;
        services.push(spawn_server(
            "PAYMENT_SERVICE",
            payment.http_port(),
            payment.run_until_stopped(),
        ));

        let analytics = analytics_service::Application::build_with_store(
            analytics_service::config::AnalyticsConfig {
                common: common(),
                port: 0,
                store: StoreConfig::memory(),
            },
            store.clone(),
        )
        .await
        .map_err(|e| anyhow!("Failed to build analytics-service: {}", e))?;
        services.push(spawn_server(
            "ANALYTICS_SERVICE",
            analytics.http_port(),
            analytics.run_until_stopped(),
        ));

        // No provider keys: the console provider only logs.
        let notification = notification_service::Application::build(NotificationConfig {
            common: common(),
            port: 0,
            email: EmailConfig::default(),
        })
        .await
        .map_err(|e| anyhow!("Failed to build notification-service: {}", e))?;
        services.push(spawn_server(
            "NOTIFICATION_SERVICE",
            notification.http_port(),
            notification.run_until_stopped(),
        ));

        let gateway = api_gateway::Application::build(GatewayConfig {
            common: common(),
            port: 0,
            routes: gateway_routes(&services)?,
            cors_origins: Vec::new(),
        })
        .await
        .map_err(|e| anyhow!("Failed to build api-gateway: {}", e))?;
        let gateway_url = spawn_server(
            "API_GATEWAY",
            gateway.http_port(),
            gateway.run_until_stopped(),
        )
        .url;

        let stack = Self {
            gateway_url,
            services,
            store,
            client: reqwest::Client::new(),
        };
        stack.wait_until_healthy(Duration::from_secs(10)).await?;
        Ok(stack)
    }

    /// Poll every `/health` (gateway included) until all answer 200.
    pub async fn wait_until_healthy(&self, timeout: Duration) -> Result<()> {
        let mut urls: Vec<(&str, String)> = self
            .services
            .iter()
            .map(|s| (s.name, s.health_url()))
            .collect();
        urls.push(("API_GATEWAY", format!("{}/health", self.gateway_url)));

        let start = std::time::Instant::now();
        loop {
            let mut unhealthy = Vec::new();
            for (name, url) in &urls {
                match self.client.get(url).send().await {
                    Ok(resp) if resp.status().is_success() => {}
                    Ok(resp) => unhealthy.push(format!("{} (status: {})", name, resp.status())),
                    Err(e) => unhealthy.push(format!("{} (error: {})", name, e)),
                }
            }

            if unhealthy.is_empty() {
                tracing::info!("All services are healthy");
                return Ok(());
            }
            if start.elapsed() > timeout {
                return Err(anyhow!(
                    "Timeout waiting for services. Unhealthy: {}",
                    unhealthy.join(", ")
                ));
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.gateway_url, path)
    }

    /// GET through the gateway, returning status and JSON body.
    pub async fn get(&self, path: &str) -> Result<(u16, Value)> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status().as_u16();
        Ok((status, response.json().await?))
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<(u16, Value)> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let status = response.status().as_u16();
        Ok((status, response.json().await?))
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<(u16, Value)> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        let status = response.status().as_u16();
        Ok((status, response.json().await?))
    }

    pub async fn delete(&self, path: &str) -> Result<(u16, Value)> {
        let response = self.client.delete(self.url(path)).send().await?;
        let status = response.status().as_u16();
        Ok((status, response.json().await?))
    }
}

/// Gateway prefix table pointing at the spawned services.
pub fn gateway_routes(services: &[ServiceEndpoint]) -> Result<Vec<ServiceRoute>> {
    let mut routes = Vec::new();
    for (name, _, prefixes) in SERVICES {
        let endpoint = services
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| anyhow!("No running service for {}", name))?;
        for prefix in prefixes {
            routes.push(ServiceRoute {
                prefix: prefix.to_string(),
                service: name.to_ascii_lowercase().replace('_', "-"),
                base_url: endpoint.url.clone(),
            });
        }
    }
    Ok(routes)
}
