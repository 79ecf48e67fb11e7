//! Prometheus metrics for notification-service.

use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, IntCounterVec};

/// Delivery attempts by provider, message kind and outcome.
pub static NOTIFICATION_SENT_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "notification_sent_total",
        "Total emails handed to a provider by provider, kind and status",
        &["provider", "kind", "status"]
    )
    .expect("Failed to register notification_sent_total")
});

pub fn init_metrics() {
    service_core::observability::init_metrics();
    Lazy::force(&NOTIFICATION_SENT_TOTAL);
}

pub fn record_send(provider: &str, kind: &str, success: bool) {
    let status = if success { "sent" } else { "failed" };
    NOTIFICATION_SENT_TOTAL
        .with_label_values(&[provider, kind, status])
        .inc();
}
