//! Application startup and lifecycle management.

use crate::config::AnalyticsConfig;
use crate::handlers::dashboard::{overdue, revenue, stats, top_customers_report};
use crate::services::{init_metrics, AnalyticsRepository};
use axum::{routing::get, Router};
use service_core::error::AppError;
use service_core::server::{probe_routes, serve, with_http_layers};
use service_core::store::Store;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub repository: AnalyticsRepository,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            repository: AnalyticsRepository::new(store),
        }
    }
}

fn reports() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/revenue", get(revenue))
        .route("/top-customers", get(top_customers_report))
        .route("/overdue", get(overdue))
}

/// The same reports under `/dashboard` and `/analytics`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/dashboard", reports())
        .nest("/analytics", reports())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: AnalyticsConfig) -> Result<Self, AppError> {
        let store = Store::connect(&config.store);
        Self::build_with_store(config, store).await
    }

    pub async fn build_with_store(
        config: AnalyticsConfig,
        store: Store,
    ) -> Result<Self, AppError> {
        init_metrics();

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let http_port = listener.local_addr()?.port();

        let router = with_http_layers(
            router(AppState::new(store))
                .merge(probe_routes("analytics-service", env!("CARGO_PKG_VERSION"))),
        );

        tracing::info!("Analytics service listening on port {}", http_port);

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
