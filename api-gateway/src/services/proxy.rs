//! Forwarding of one inbound request to its owning service.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, Request, Response};
use reqwest::Client;
use service_core::error::AppError;
use service_core::observability::{extract_request_id, inject_trace_headers};

use crate::config::ServiceRoute;
use crate::services::metrics::record_upstream;

/// Connection-scoped headers never forwarded in either direction.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
}

#[derive(Clone)]
pub struct Proxy {
    client: Client,
}

impl Default for Proxy {
    fn default() -> Self {
        Self::new()
    }
}

impl Proxy {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Send `request` to `route` and relay the reply verbatim. Transport
    /// failures become 503 `Service unavailable`.
    pub async fn forward(
        &self,
        route: &ServiceRoute,
        request: Request<Body>,
    ) -> Result<Response<Body>, AppError> {
        let (parts, body) = request.into_parts();

        let mut target = format!("{}{}", route.base_url, parts.uri.path());
        if let Some(query) = parts.uri.query() {
            target.push('?');
            target.push_str(query);
        }

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        headers.remove(header::HOST);
        headers.remove(header::CONTENT_LENGTH);
        let request_id = extract_request_id(&headers);
        inject_trace_headers(&mut headers, request_id.as_deref());

        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Failed to read request body: {}", e)))?;

        tracing::info!(
            method = %parts.method,
            path = %parts.uri.path(),
            service = %route.service,
            target = %target,
            "Proxying request"
        );

        let upstream = self
            .client
            .request(parts.method, &target)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                record_upstream(&route.service, "unavailable");
                tracing::error!(service = %route.service, target = %target, error = %e, "Error forwarding request");
                AppError::ServiceUnavailable("Service unavailable".to_string())
            })?;

        let status = upstream.status();
        record_upstream(&route.service, status.as_str());

        let mut response_headers = upstream.headers().clone();
        strip_hop_by_hop(&mut response_headers);
        response_headers.remove(header::CONTENT_LENGTH);

        let bytes = upstream.bytes().await.map_err(|e| {
            tracing::error!(service = %route.service, error = %e, "Failed to read upstream body");
            AppError::ServiceUnavailable("Service unavailable".to_string())
        })?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = response_headers;
        Ok(response)
    }
}
