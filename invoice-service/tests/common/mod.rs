#![allow(dead_code)]

use async_trait::async_trait;
use invoice_service::config::{InvoiceConfig, PdfBranding};
use invoice_service::Application;
use serde_json::{json, Value};
use service_core::config::{Config, StoreConfig};
use service_core::store::{
    Filter, FilterOp, MemoryTableStore, SelectQuery, Store, StoreError, TableStore,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

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
        let config = InvoiceConfig {
            common: Config::default(),
            port: 0,
            store: StoreConfig::memory(),
            branding: PdfBranding::default(),
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

    pub async fn seed(&self, table: &str, row: Value) -> Value {
        self.store
            .insert::<_, Value>(table, &row)
            .await
            .expect("Failed to seed row")
    }

    pub async fn seed_customer(&self, name: &str) -> String {
        let row = self
            .seed(
                "customers",
                json!({
                    "name": name,
                    "email": format!("{}@example.com", name.to_lowercase()),
                    "address": "Jl. Sudirman 1",
                    "city": "Jakarta",
                    "country": "Indonesia"
                }),
            )
            .await;
        row["id"].as_str().expect("seeded id").to_string()
    }

    pub async fn create_invoice(&self, body: Value) -> reqwest::Response {
        self.client
            .post(self.url("/invoices"))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request");
        let status = response.status().as_u16();
        let body = response.json().await.expect("Failed to parse JSON");
        (status, body)
    }
}

pub fn invoice_body(customer_id: &str) -> Value {
    json!({
        "customer_id": customer_id,
        "items": [
            { "description": "Design", "quantity": 2, "unit_price": 50 },
            { "description": "Hosting", "quantity": 1, "unit_price": 100 }
        ],
        "tax": 10,
        "discount": 20,
        "notes": "Net 30"
    })
}

/// Memory store that parks every invoice-number count until `parties`
/// callers have read it, so their creates race on the same count.
pub struct CountBarrierStore {
    inner: MemoryTableStore,
    barrier: Barrier,
}

impl CountBarrierStore {
    pub fn store(parties: usize) -> Store {
        Store::new(Arc::new(Self {
            inner: MemoryTableStore::new(),
            barrier: Barrier::new(parties),
        }))
    }
}

#[async_trait]
impl TableStore for CountBarrierStore {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError> {
        let rows = self.inner.select(query).await?;
        let numbering = query
            .filters
            .iter()
            .any(|f| f.column == "invoice_number" && f.op == FilterOp::Like);
        if numbering {
            self.barrier.wait().await;
        }
        Ok(rows)
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
        self.inner.update(table, filters, patch).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, StoreError> {
        self.inner.delete(table, filters).await
    }
}
