#![allow(dead_code)]

use async_trait::async_trait;
use payment_service::config::PaymentConfig;
use payment_service::Application;
use serde_json::{json, Value};
use service_core::config::{Config, StoreConfig};
use service_core::store::{Filter, MemoryTableStore, SelectQuery, Store, StoreError, TableStore};
use std::sync::Arc;
use std::time::Duration;

pub struct TestApp {
    pub address: String,
    pub store: Store,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Store::memory()).await
    }

    pub async fn spawn_with_store(store: Store) -> Self {
        let config = PaymentConfig {
            common: Config::default(),
            port: 0,
            store: StoreConfig::memory(),
        };

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

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn seed_invoice(&self, total: f64, paid_amount: f64) -> String {
        let row: Value = self
            .store
            .insert(
                "invoices",
                &json!({
                    "customer_id": "c-1",
                    "invoice_number": "INV-2026-0001",
                    "total": total,
                    "paid_amount": paid_amount,
                    "payment_status": "unpaid"
                }),
            )
            .await
            .expect("Failed to seed invoice");
        row["id"].as_str().expect("seeded id").to_string()
    }

    pub async fn invoice(&self, id: &str) -> Value {
        let mut rows: Vec<Value> = self
            .store
            .select(SelectQuery::from("invoices").filter(Filter::eq("id", id)))
            .await
            .expect("Failed to read invoice");
        rows.pop().expect("invoice exists")
    }

    pub async fn pay(&self, body: Value) -> reqwest::Response {
        self.client
            .post(self.url("/payments"))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Memory store whose invoice updates always fail, for exercising the
/// payment-written-but-invoice-not-updated path.
pub struct FailingInvoiceUpdates {
    inner: MemoryTableStore,
}

impl FailingInvoiceUpdates {
    pub fn store() -> Store {
        Store::new(Arc::new(Self {
            inner: MemoryTableStore::new(),
        }))
    }
}

#[async_trait]
impl TableStore for FailingInvoiceUpdates {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError> {
        self.inner.select(query).await
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, StoreError> {
        self.inner.insert(table, rows).await
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        if table == "invoices" {
            return Err(StoreError::Remote {
                status: 503,
                message: "upstream unavailable".to_string(),
            });
        }
        self.inner.update(table, filters, patch).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, StoreError> {
        self.inner.delete(table, filters).await
    }
}
