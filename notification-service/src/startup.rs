//! Application startup and lifecycle management.

use crate::config::NotificationConfig;
use crate::handlers::notifications::{send_email, send_reminder};
use crate::services::{init_metrics, providers, EmailProvider};
use axum::{routing::post, Router};
use service_core::error::AppError;
use service_core::server::{probe_routes, serve, with_http_layers};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub email_provider: Arc<dyn EmailProvider>,
}

impl AppState {
    pub fn new(email_provider: Arc<dyn EmailProvider>) -> Self {
        Self { email_provider }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/notifications/send", post(send_email))
        .route("/notifications/reminder", post(send_reminder))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: NotificationConfig) -> Result<Self, AppError> {
        let provider = providers::from_config(&config.email);
        Self::build_with_provider(config, provider).await
    }

    pub async fn build_with_provider(
        config: NotificationConfig,
        email_provider: Arc<dyn EmailProvider>,
    ) -> Result<Self, AppError> {
        init_metrics();

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let http_port = listener.local_addr()?.port();

        let router = with_http_layers(
            router(AppState::new(email_provider))
                .merge(probe_routes("notification-service", env!("CARGO_PKG_VERSION"))),
        );

        tracing::info!("Notification service listening on port {}", http_port);

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
