//! service-core: Shared infrastructure for the invoicing microservices.
pub mod config;
pub mod currency;
pub mod error;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod response;
pub mod server;
pub mod store;

pub use async_trait;
pub use axum;
pub use rust_decimal;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tower;
pub use tower_http;
pub use tracing;
pub use validator;
