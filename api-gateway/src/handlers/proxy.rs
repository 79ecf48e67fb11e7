use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::Response;
use service_core::error::AppError;

use crate::startup::AppState;

/// Fallback for every path not answered locally.
#[tracing::instrument(skip(state, request), fields(path = %request.uri().path()))]
pub async fn proxy_request(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response<Body>, AppError> {
    let route = state.routes.resolve(request.uri().path()).ok_or_else(|| {
        tracing::warn!("No service owns this path");
        AppError::NotFound(anyhow::anyhow!("Service not found"))
    })?;

    state.proxy.forward(route, request).await
}
