//! Process-wide metrics: the `metrics` recorder backing the HTTP middleware,
//! and the default `prometheus` registry holding domain counters.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use prometheus::{register_histogram_vec, HistogramVec, TextEncoder};
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Table store round-trip duration by table and verb.
pub static STORE_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "store_request_duration_seconds",
        "Table store request duration in seconds",
        &["table", "operation"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("Failed to register store_request_duration")
});

/// Install the Prometheus recorder. Safe to call more than once; later calls
/// (for example from several services in one process) are no-ops.
pub fn init_metrics() {
    Lazy::force(&STORE_REQUEST_DURATION);

    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => tracing::warn!(error = %e, "Prometheus recorder already installed"),
    }
}

/// Both metric sources in Prometheus text format.
pub fn render_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    let encoder = TextEncoder::new();
    if let Ok(custom_metrics) = encoder.encode_to_string(&prometheus::gather()) {
        output.push_str(&custom_metrics);
    }

    output
}
