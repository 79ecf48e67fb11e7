//! Prometheus metrics for invoice-service.

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, CounterVec};

/// Invoice writes by operation.
pub static INVOICE_WRITES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_writes_total",
        "Total number of invoice writes by operation",
        &["operation"] // create, update, delete
    )
    .expect("Failed to register invoice_writes_total")
});

/// Invoiced amount by currency.
pub static INVOICE_AMOUNT_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_amount_total",
        "Total invoiced amount by currency",
        &["currency"]
    )
    .expect("Failed to register invoice_amount_total")
});

/// Rendered PDFs by outcome.
pub static PDF_RENDERS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_pdf_renders_total",
        "Total number of invoice PDF renders",
        &["status"]
    )
    .expect("Failed to register invoice_pdf_renders_total")
});

pub fn init_metrics() {
    service_core::observability::init_metrics();
    Lazy::force(&INVOICE_WRITES_TOTAL);
    Lazy::force(&INVOICE_AMOUNT_TOTAL);
    Lazy::force(&PDF_RENDERS_TOTAL);
}

pub fn record_write(operation: &str) {
    INVOICE_WRITES_TOTAL.with_label_values(&[operation]).inc();
}

pub fn record_invoiced(currency: &str, amount: f64) {
    INVOICE_AMOUNT_TOTAL
        .with_label_values(&[currency])
        .inc_by(amount.max(0.0));
}

pub fn record_pdf(status: &str) {
    PDF_RENDERS_TOTAL.with_label_values(&[status]).inc();
}
