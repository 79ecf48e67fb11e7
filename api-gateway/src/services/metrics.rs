//! Prometheus metrics for api-gateway.

use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, IntCounterVec};

/// Forwarded requests by target service and upstream status (or
/// `unavailable` when the service could not be reached).
pub static GATEWAY_UPSTREAM_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "gateway_upstream_requests_total",
        "Total proxied requests by service and upstream status",
        &["service", "status"]
    )
    .expect("Failed to register gateway_upstream_requests_total")
});

pub fn init_metrics() {
    service_core::observability::init_metrics();
    Lazy::force(&GATEWAY_UPSTREAM_REQUESTS_TOTAL);
}

pub fn record_upstream(service: &str, status: &str) {
    GATEWAY_UPSTREAM_REQUESTS_TOTAL
        .with_label_values(&[service, status])
        .inc();
}
