pub mod calculation;
pub mod metrics;
pub mod pdf;
pub mod repository;

pub use metrics::init_metrics;
pub use pdf::InvoicePdf;
pub use repository::InvoiceRepository;
