//! Prometheus metrics for analytics-service.

use once_cell::sync::Lazy;
use prometheus::{register_histogram_vec, HistogramVec};

/// Rows scanned per report, by report name.
pub static REPORT_ROWS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "analytics_report_rows",
        "Invoice rows scanned per report",
        &["report"],
        vec![10.0, 100.0, 1_000.0, 10_000.0, 100_000.0]
    )
    .expect("Failed to register analytics_report_rows")
});

pub fn init_metrics() {
    service_core::observability::init_metrics();
    Lazy::force(&REPORT_ROWS);
}

pub fn observe_rows(report: &str, rows: usize) {
    REPORT_ROWS.with_label_values(&[report]).observe(rows as f64);
}
