//! Application startup and lifecycle management.

use crate::config::InvoiceConfig;
use crate::handlers::currency::{convert_currency, list_currency_rates};
use crate::handlers::invoices::{
    create_invoice, delete_invoice, filter_invoices, get_invoice, invoice_payments, invoice_pdf,
    list_invoices, update_invoice,
};
use crate::services::{init_metrics, InvoicePdf, InvoiceRepository};
use axum::{routing::get, Router};
use service_core::error::AppError;
use service_core::server::{probe_routes, serve, with_http_layers};
use service_core::store::Store;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub repository: InvoiceRepository,
    pub pdf: InvoicePdf,
}

impl AppState {
    pub fn new(store: Store, pdf: InvoicePdf) -> Self {
        Self {
            repository: InvoiceRepository::new(store),
            pdf,
        }
    }
}

/// Invoice and currency-rate routes without probes or middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/filter", get(filter_invoices))
        .route(
            "/invoices/:id",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .route("/invoices/:id/pdf", get(invoice_pdf))
        .route("/invoices/:id/payments", get(invoice_payments))
        .route("/currency-rates", get(list_currency_rates))
        .route("/currency-rates/convert", get(convert_currency))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: InvoiceConfig) -> Result<Self, AppError> {
        let store = Store::connect(&config.store);
        Self::build_with_store(config, store).await
    }

    pub async fn build_with_store(config: InvoiceConfig, store: Store) -> Result<Self, AppError> {
        init_metrics();

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let http_port = listener.local_addr()?.port();

        let state = AppState::new(store, InvoicePdf::new(config.branding.clone()));
        let router = with_http_layers(
            router(state).merge(probe_routes("invoice-service", env!("CARGO_PKG_VERSION"))),
        );

        tracing::info!("Invoice service listening on port {}", http_port);

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
