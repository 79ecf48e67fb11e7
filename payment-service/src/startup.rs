//! Application startup and lifecycle management.

use crate::config::PaymentConfig;
use crate::handlers::payments::{create_payment, invoice_payments, list_payments};
use crate::services::{init_metrics, PaymentRepository};
use axum::{routing::get, Router};
use service_core::error::AppError;
use service_core::server::{probe_routes, serve, with_http_layers};
use service_core::store::Store;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub repository: PaymentRepository,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            repository: PaymentRepository::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/payments", get(list_payments).post(create_payment))
        .route("/payments/invoice/:id", get(invoice_payments))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: PaymentConfig) -> Result<Self, AppError> {
        let store = Store::connect(&config.store);
        Self::build_with_store(config, store).await
    }

    pub async fn build_with_store(config: PaymentConfig, store: Store) -> Result<Self, AppError> {
        init_metrics();

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let http_port = listener.local_addr()?.port();

        let router = with_http_layers(
            router(AppState::new(store))
                .merge(probe_routes("payment-service", env!("CARGO_PKG_VERSION"))),
        );

        tracing::info!("Payment service listening on port {}", http_port);

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
