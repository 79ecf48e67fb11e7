//! Prometheus metrics for customer-service.

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, CounterVec};

/// Customer writes by operation.
pub static CUSTOMER_WRITES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "customer_writes_total",
        "Total number of customer writes by operation",
        &["operation"] // create, update, delete
    )
    .expect("Failed to register customer_writes_total")
});

pub fn init_metrics() {
    service_core::observability::init_metrics();
    Lazy::force(&CUSTOMER_WRITES_TOTAL);
}

pub fn record_write(operation: &str) {
    CUSTOMER_WRITES_TOTAL.with_label_values(&[operation]).inc();
}
