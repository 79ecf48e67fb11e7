//! Prometheus metrics for payment-service.

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, CounterVec};

/// Recorded payments by method.
pub static PAYMENTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "payments_recorded_total",
        "Total number of recorded payments by payment method",
        &["payment_method"]
    )
    .expect("Failed to register payments_recorded_total")
});

/// Invoice settlements that failed after the payment row was written.
pub static SETTLEMENT_FAILURES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "payment_settlement_failures_total",
        "Payments whose invoice update failed",
        &["reason"]
    )
    .expect("Failed to register payment_settlement_failures_total")
});

pub fn init_metrics() {
    service_core::observability::init_metrics();
    Lazy::force(&PAYMENTS_TOTAL);
    Lazy::force(&SETTLEMENT_FAILURES_TOTAL);
}
