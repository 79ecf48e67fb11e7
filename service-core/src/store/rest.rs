//! PostgREST-dialect client for the hosted table store.

use super::query::{filter_pairs, Filter, SelectQuery};
use super::{StoreError, TableStore};
use crate::config::StoreConfig;
use crate::observability::trace_context::inject_trace_context;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;

const REST_PATH: &str = "rest/v1";

#[derive(Clone)]
pub struct RestTableStore {
    client: Client,
    base_url: String,
    key: Secret<String>,
}

impl RestTableStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            key: config.key.clone(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PATH, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);

        let key = self.key.expose_secret();
        self.client
            .request(method, self.table_url(table))
            .headers(headers)
            .header("apikey", key.as_str())
            .bearer_auth(key)
    }

    fn returning(&self, method: Method, table: &str) -> RequestBuilder {
        self.request(method, table)
            .header("Prefer", "return=representation")
    }

    async fn rows(table: &str, verb: &str, response: Response) -> Result<Vec<Value>, StoreError> {
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(
            table = %table,
            verb = %verb,
            status = status.as_u16(),
            "Table store response"
        );

        if !status.is_success() {
            return Err(StoreError::Remote {
                status: status.as_u16(),
                message: body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl TableStore for RestTableStore {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError> {
        let response = self
            .request(Method::GET, &query.table)
            .query(&query.to_query_pairs())
            .send()
            .await?;
        Self::rows(&query.table, "select", response).await
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, StoreError> {
        let response = self
            .returning(Method::POST, table)
            .json(&rows)
            .send()
            .await?;
        Self::rows(table, "insert", response).await
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        let response = self
            .returning(Method::PATCH, table)
            .query(&filter_pairs(filters))
            .json(&patch)
            .send()
            .await?;
        Self::rows(table, "update", response).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Value>, StoreError> {
        let response = self
            .returning(Method::DELETE, table)
            .query(&filter_pairs(filters))
            .send()
            .await?;
        Self::rows(table, "delete", response).await
    }
}
