//! Application startup and lifecycle management.

use crate::config::MonolithConfig;
use axum::{routing::any, Router};
use invoice_service::config::PdfBranding;
use invoice_service::services::InvoicePdf;
use notification_service::services::{providers, EmailProvider};
use service_core::error::AppError;
use service_core::server::{cors_layer, probe_routes, serve, with_http_layers};
use service_core::store::Store;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Path prefixes served from the table store.
pub const STORE_PREFIXES: [&str; 6] = [
    "/customers",
    "/invoices",
    "/currency-rates",
    "/payments",
    "/dashboard",
    "/analytics",
];

/// Every service router in one. Without a store the resource routes answer
/// 501; notifications keep working.
pub fn router(
    store: Option<Store>,
    branding: PdfBranding,
    email_provider: Arc<dyn EmailProvider>,
) -> Router {
    let resources = match store {
        Some(store) => Router::new()
            .merge(customer_service::router(customer_service::AppState::new(
                store.clone(),
            )))
            .merge(invoice_service::router(invoice_service::AppState::new(
                store.clone(),
                InvoicePdf::new(branding),
            )))
            .merge(payment_service::router(payment_service::AppState::new(
                store.clone(),
            )))
            .merge(analytics_service::router(analytics_service::AppState::new(
                store,
            ))),
        None => unconfigured_routes(),
    };

    resources.merge(notification_service::router(
        notification_service::AppState::new(email_provider),
    ))
}

fn unconfigured_routes() -> Router {
    STORE_PREFIXES.iter().fold(Router::new(), |router, prefix| {
        router
            .route(prefix, any(database_not_configured))
            .route(&format!("{}/*rest", prefix), any(database_not_configured))
    })
}

async fn database_not_configured() -> AppError {
    AppError::NotImplemented("Database not configured".to_string())
}

fn init_metrics() {
    customer_service::services::init_metrics();
    invoice_service::services::init_metrics();
    payment_service::services::init_metrics();
    analytics_service::services::init_metrics();
    notification_service::services::init_metrics();
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: MonolithConfig) -> Result<Self, AppError> {
        let store = config.store.as_ref().map(Store::connect);
        let provider = providers::from_config(&config.email);
        Self::build_with(config, store, provider).await
    }

    /// Build with explicit collaborators. Tests pass `Store::memory()` or
    /// `None` to exercise the unconfigured mode.
    pub async fn build_with(
        config: MonolithConfig,
        store: Option<Store>,
        email_provider: Arc<dyn EmailProvider>,
    ) -> Result<Self, AppError> {
        init_metrics();

        if store.is_none() {
            tracing::warn!("SUPABASE_URL and SUPABASE_KEY not set; resource routes return 501");
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let http_port = listener.local_addr()?.port();

        let router = with_http_layers(
            router(store, config.branding, email_provider)
                .merge(probe_routes("monolith", env!("CARGO_PKG_VERSION"))),
        )
        .layer(cors_layer(&config.cors_origins));

        tracing::info!("Monolith listening on port {}", http_port);

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
