//! Application startup and lifecycle management.

use crate::config::GatewayConfig;
use crate::handlers::proxy::proxy_request;
use crate::services::{init_metrics, Proxy, RouteTable};
use axum::Router;
use service_core::error::AppError;
use service_core::server::{cors_layer, probe_routes, serve, with_http_layers};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub proxy: Proxy,
}

impl AppState {
    pub fn new(routes: RouteTable) -> Self {
        Self {
            routes: Arc::new(routes),
            proxy: Proxy::new(),
        }
    }
}

/// Everything except the local probes goes to the proxy.
pub fn router(state: AppState) -> Router {
    Router::new().fallback(proxy_request).with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: GatewayConfig) -> Result<Self, AppError> {
        init_metrics();

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let http_port = listener.local_addr()?.port();

        for route in &config.routes {
            tracing::info!(prefix = %route.prefix, target = %route.base_url, "Route registered");
        }

        let state = AppState::new(RouteTable::new(config.routes));
        let router = with_http_layers(
            probe_routes("api-gateway", env!("CARGO_PKG_VERSION")).merge(router(state)),
        )
        .layer(cors_layer(&config.cors_origins));

        tracing::info!("API gateway listening on port {}", http_port);

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
