//! Application startup and lifecycle management.

use crate::config::CustomerConfig;
use crate::handlers::customers::{
    create_customer, delete_customer, get_customer, list_customers, update_customer,
};
use crate::services::{init_metrics, CustomerRepository};
use axum::{routing::get, Router};
use service_core::error::AppError;
use service_core::server::{probe_routes, serve, with_http_layers};
use service_core::store::Store;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub repository: CustomerRepository,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            repository: CustomerRepository::new(store),
        }
    }
}

/// Customer routes without probes or middleware, so the monolith can merge
/// them with the other services.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: CustomerConfig) -> Result<Self, AppError> {
        let store = Store::connect(&config.store);
        Self::build_with_store(config, store).await
    }

    /// Build against an explicit store. Tests pass `Store::memory()`.
    pub async fn build_with_store(config: CustomerConfig, store: Store) -> Result<Self, AppError> {
        init_metrics();

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let http_port = listener.local_addr()?.port();

        let router = with_http_layers(
            router(AppState::new(store))
                .merge(probe_routes("customer-service", env!("CARGO_PKG_VERSION"))),
        );

        tracing::info!("Customer service listening on port {}", http_port);

        Ok(Self {
            http_port,
            listener,
            router,
        })
    }

    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        serve(self.listener, self.router).await
    }
}
