//! Client side of the hosted table store.
//!
//! Every service persists through [`Store`], a typed façade over a
//! [`TableStore`] implementation. Production talks to a PostgREST endpoint
//! via [`RestTableStore`]; tests and local runs use [`MemoryTableStore`],
//! which honours the same filter semantics.

pub mod memory;
pub mod query;
pub mod rest;

use crate::config::{StoreBackend, StoreConfig};
use crate::observability::metrics::STORE_REQUEST_DURATION;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

pub use memory::MemoryTableStore;
pub use query::{Direction, Filter, FilterOp, FilterValue, Order, SelectQuery};
pub use rest::RestTableStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(String),

    #[error("store returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("failed to decode store response: {0}")]
    Decode(String),

    #[error("failed to encode store payload: {0}")]
    Encode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

/// Per-table verbs offered by the remote store. Every write returns the
/// affected rows.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError>;
    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, StoreError>;
    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError>;
    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, StoreError>;
}

#[derive(Clone)]
pub struct Store {
    inner: Arc<dyn TableStore>,
}

impl Store {
    pub fn new(inner: Arc<dyn TableStore>) -> Self {
        Self { inner }
    }

    pub fn connect(config: &StoreConfig) -> Self {
        match config.backend {
            StoreBackend::Rest => {
                tracing::info!(url = %config.url, "Using REST table store");
                Self::new(Arc::new(RestTableStore::new(config)))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory table store; data is not persisted");
                Self::memory()
            }
        }
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryTableStore::new()))
    }

    pub async fn select<T: DeserializeOwned>(
        &self,
        query: SelectQuery,
    ) -> Result<Vec<T>, StoreError> {
        let timer = STORE_REQUEST_DURATION
            .with_label_values(&[query.table.as_str(), "select"])
            .start_timer();
        let rows = self.inner.select(&query).await;
        timer.observe_duration();
        decode_rows(rows?)
    }

    pub async fn select_one<T: DeserializeOwned>(
        &self,
        query: SelectQuery,
    ) -> Result<Option<T>, StoreError> {
        let mut rows = self.select(query.limit(1)).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    /// Number of rows matching the query's filters.
    pub async fn count(&self, query: SelectQuery) -> Result<usize, StoreError> {
        let rows: Vec<Value> = self.select(query.columns(&["id"])).await?;
        Ok(rows.len())
    }

    /// Insert one row and return it as stored.
    pub async fn insert<I: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        row: &I,
    ) -> Result<T, StoreError> {
        let payload = serde_json::to_value(row).map_err(|e| StoreError::Encode(e.to_string()))?;
        let timer = STORE_REQUEST_DURATION
            .with_label_values(&[table, "insert"])
            .start_timer();
        let rows = self.inner.insert(table, vec![payload]).await;
        timer.observe_duration();

        let mut decoded: Vec<T> = decode_rows(rows?)?;
        if decoded.is_empty() {
            return Err(StoreError::Decode(format!(
                "insert into {} returned no rows",
                table
            )));
        }
        Ok(decoded.swap_remove(0))
    }

    pub async fn update<P: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[Filter],
        patch: &P,
    ) -> Result<Vec<T>, StoreError> {
        let payload =
            serde_json::to_value(patch).map_err(|e| StoreError::Encode(e.to_string()))?;
        let timer = STORE_REQUEST_DURATION
            .with_label_values(&[table, "update"])
            .start_timer();
        let rows = self.inner.update(table, filters, payload).await;
        timer.observe_duration();
        decode_rows(rows?)
    }

    /// Delete matching rows and return how many were removed.
    pub async fn delete(&self, table: &str, filters: &[Filter]) -> Result<usize, StoreError> {
        let timer = STORE_REQUEST_DURATION
            .with_label_values(&[table, "delete"])
            .start_timer();
        let rows = self.inner.delete(table, filters).await;
        timer.observe_duration();
        Ok(rows?.len())
    }
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| StoreError::Decode(e.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: String,
        name: String,
    }

    #[tokio::test]
    async fn typed_insert_returns_stored_row() {
        let store = Store::memory();
        let row: Row = store
            .insert("customers", &json!({"name": "Acme"}))
            .await
            .unwrap();

        assert_eq!(row.name, "Acme");
        assert!(!row.id.is_empty());
    }

    #[tokio::test]
    async fn select_one_returns_none_for_missing_row() {
        let store = Store::memory();
        let found: Option<Row> = store
            .select_one(SelectQuery::from("customers").filter(Filter::eq("id", "missing")))
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn decode_failure_is_reported() {
        let store = Store::memory();
        let _: Value = store
            .insert("customers", &json!({"name": 42}))
            .await
            .unwrap();

        let err = store
            .select::<Row>(SelectQuery::from("customers"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[tokio::test]
    async fn count_and_delete_report_row_numbers() {
        let store = Store::memory();
        for name in ["a", "b", "c"] {
            let _: Value = store
                .insert("customers", &json!({"name": name}))
                .await
                .unwrap();
        }

        assert_eq!(store.count(SelectQuery::from("customers")).await.unwrap(), 3);
        let removed = store
            .delete("customers", &[Filter::eq("name", "b")])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.count(SelectQuery::from("customers")).await.unwrap(), 2);
    }
}
